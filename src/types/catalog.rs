use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a replication run. Stamped onto every stream processed in that run
/// as its sync id.
pub type JobId = u64;

/// Monotonically increasing per-stream counter marking a batch of data produced by one run.
///
/// Destinations use generation ids to decide which historical data remains valid.
pub type GenerationId = u64;

/// Error returned when parsing a wire-format mode string fails.
#[derive(Debug, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
}

/// A named, optionally namespaced unit of replicated data, analogous to a table.
///
/// Two keys are equal iff both fields match. An absent namespace is a concrete value
/// distinct from any present namespace, never a wildcard.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamKey {
    /// The name of the stream
    pub name: String,
    /// The namespace containing the stream, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl StreamKey {
    pub fn new(name: String, namespace: Option<String>) -> StreamKey {
        Self { name, namespace }
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// How the source reads a stream during a run.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// The source re-reads the whole stream every run
    FullRefresh,
    /// The source reads only records produced since the previous run
    Incremental,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullRefresh => write!(f, "full_refresh"),
            Self::Incremental => write!(f, "incremental"),
        }
    }
}

impl FromStr for SyncMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_refresh" => Ok(Self::FullRefresh),
            "incremental" => Ok(Self::Incremental),
            other => Err(ParseModeError {
                kind: "sync mode",
                value: other.to_string(),
            }),
        }
    }
}

/// How the destination applies a stream's data.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationSyncMode {
    /// New records are appended to whatever is already there
    Append,
    /// The run's data replaces all prior data for the stream
    Overwrite,
    /// Like overwrite, but the destination also deduplicates on the primary key
    OverwriteDedup,
}

impl fmt::Display for DestinationSyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => write!(f, "append"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::OverwriteDedup => write!(f, "overwrite_dedup"),
        }
    }
}

impl FromStr for DestinationSyncMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(Self::Append),
            "overwrite" => Ok(Self::Overwrite),
            "overwrite_dedup" => Ok(Self::OverwriteDedup),
            other => Err(ParseModeError {
                kind: "destination sync mode",
                value: other.to_string(),
            }),
        }
    }
}

/// A stream as configured for one run, plus the generation and sync annotations stamped
/// onto it at planning time.
///
/// The annotation fields are unset until the catalog passes through the generation
/// assigner. A configured stream lives for one run's planning phase and is replaced
/// each run.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    pub stream: StreamKey,
    pub sync_mode: SyncMode,
    pub destination_sync_mode: DestinationSyncMode,
    /// The generation produced by this run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_id: Option<GenerationId>,
    /// The oldest generation the destination must still consider valid. Zero means all
    /// history remains valid; equal to `generation_id` means full truncate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_generation_id: Option<GenerationId>,
    /// The run that stamped this stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_id: Option<JobId>,
}

impl ConfiguredStream {
    /// Creates a configured stream with unset generation and sync annotations.
    pub fn new(
        stream: StreamKey,
        sync_mode: SyncMode,
        destination_sync_mode: DestinationSyncMode,
    ) -> ConfiguredStream {
        Self {
            stream,
            sync_mode,
            destination_sync_mode,
            generation_id: None,
            minimum_generation_id: None,
            sync_id: None,
        }
    }
}

/// The ordered set of streams configured for one run.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<ConfiguredStream>,
}

impl Catalog {
    pub fn new(streams: Vec<ConfiguredStream>) -> Catalog {
        Self { streams }
    }

    /// Returns the stream keys in catalog order.
    pub fn stream_keys(&self) -> impl Iterator<Item = &StreamKey> {
        self.streams.iter().map(|configured| &configured.stream)
    }
}

/// The highest previously-completed generation for a stream, supplied by the
/// generation-history provider. Read-only input to the assigner.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct StreamGeneration {
    pub stream: StreamKey,
    pub generation_id: GenerationId,
}

impl StreamGeneration {
    pub fn new(stream: StreamKey, generation_id: GenerationId) -> StreamGeneration {
        Self {
            stream,
            generation_id,
        }
    }
}
