use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::EpochMillis;
use crate::types::StreamKey;

/// Per-stream status emitted by the reporting process during a run.
///
/// Only [`StreamStatus::Complete`] affects completion tracking. The other variants are
/// observed and ignored.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Started,
    Running,
    RateLimited,
    Incomplete,
    Complete,
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::Running => write!(f, "running"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::Incomplete => write!(f, "incomplete"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// A status observation delivered to the completion tracker by a reporting channel.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct StreamStatusEvent {
    pub stream: StreamKey,
    pub status: StreamStatus,
}

impl StreamStatusEvent {
    pub fn new(stream: StreamKey, status: StreamStatus) -> StreamStatusEvent {
        Self { stream, status }
    }
}

/// A terminal status message synthesized when a run finalizes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct StreamStatusMessage {
    pub stream: StreamKey,
    pub status: StreamStatus,
    /// When the message was emitted, in epoch milliseconds. Synthesized messages carry
    /// the instant tracking started.
    pub emitted_at: EpochMillis,
}

impl StreamStatusMessage {
    /// Creates a [`StreamStatus::Complete`] message for `stream` emitted at `emitted_at`.
    pub fn completed(stream: StreamKey, emitted_at: EpochMillis) -> StreamStatusMessage {
        Self {
            stream,
            status: StreamStatus::Complete,
            emitted_at,
        }
    }
}
