use serde::{Deserialize, Serialize};

use crate::types::StreamKey;

/// Kind of partial refresh requested for a single stream.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshType {
    /// Invalidate all prior generations for the stream, keeping only this run's data
    Truncate,
    /// Re-read the stream but keep prior generations valid
    Merge,
}

/// A targeted refresh instruction for one stream in the upcoming run.
///
/// Refresh requests are transient run inputs. A request naming a stream that is not in
/// the catalog is ignored by the assigner.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub stream: StreamKey,
    pub refresh_type: RefreshType,
}

impl RefreshRequest {
    pub fn new(stream: StreamKey, refresh_type: RefreshType) -> RefreshRequest {
        Self {
            stream,
            refresh_type,
        }
    }
}
