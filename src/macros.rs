//! Macros for run-state error handling.
//!
//! Provides convenience macros for creating and returning [`crate::error::RunStateError`]
//! instances with reduced boilerplate.

/// Creates a [`crate::error::RunStateError`] from error kind and description.
#[macro_export]
macro_rules! run_state_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::RunStateError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::RunStateError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Creates and returns a [`crate::error::RunStateError`] from the current function.
///
/// This macro combines error creation with early return, reducing boilerplate when handling
/// error conditions that should immediately terminate execution.
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return Err($crate::run_state_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return Err($crate::run_state_error!($kind, $desc, $detail))
    };
}
