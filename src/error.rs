use std::error;
use std::fmt;

/// Convenient result type for run-state operations using [`RunStateError`] as the error type.
pub type RunStateResult<T> = Result<T, RunStateError>;

/// Main error type for run-state operations.
///
/// [`RunStateError`] pairs a coarse [`ErrorKind`] with a static description and optional
/// dynamic detail. The kind is what callers should branch on; the description and detail
/// exist for humans reading logs.
#[derive(Debug, Clone)]
pub struct RunStateError {
    repr: ErrorRepr,
}

/// Internal representation of error data.
///
/// Users should not interact with this type directly but use [`RunStateError`] methods instead.
#[derive(Debug, Clone)]
enum ErrorRepr {
    /// Error with kind and static description
    WithDescription(ErrorKind, &'static str),
    /// Error with kind, static description, and dynamic detail
    WithDescriptionAndDetail(ErrorKind, &'static str, String),
}

/// Specific categories of errors that can occur while tracking run state.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A component was driven outside its legal call sequence. This signals a bug in the
    /// orchestrating caller, not a data condition.
    InvalidState,

    /// A supplied value was malformed or inconsistent.
    InvalidData,

    /// A wire-format value could not be deserialized.
    DeserializationError,

    /// Uncategorized failure.
    Unknown,
}

impl RunStateError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => kind,
        }
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, ref detail) => Some(detail.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for RunStateError {
    fn eq(&self, other: &RunStateError) -> bool {
        self.kind() == other.kind()
    }
}

impl fmt::Display for RunStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.repr {
            ErrorRepr::WithDescription(kind, desc) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;

                Ok(())
            }
            ErrorRepr::WithDescriptionAndDetail(kind, desc, ref detail) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;
                f.write_str(" -> ")?;
                detail.fmt(f)?;

                Ok(())
            }
        }
    }
}

impl error::Error for RunStateError {}

/// Creates a [`RunStateError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for RunStateError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> RunStateError {
        RunStateError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

/// Creates a [`RunStateError`] from an error kind, static description, and dynamic detail.
impl From<(ErrorKind, &'static str, String)> for RunStateError {
    fn from((kind, desc, detail): (ErrorKind, &'static str, String)) -> RunStateError {
        RunStateError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, detail),
        }
    }
}

/// Converts [`serde_json::Error`] to [`RunStateError`] with [`ErrorKind::DeserializationError`].
impl From<serde_json::Error> for RunStateError {
    fn from(err: serde_json::Error) -> RunStateError {
        RunStateError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
                err.to_string(),
            ),
        }
    }
}
