//! Per-run tracking of stream completion signals.
//!
//! During a run the reporting process emits per-stream status events, but it is only
//! partially trusted: it may report some streams, all of them, none, or the same stream
//! several times. When the run ends the tracker reconciles what was observed against the
//! full expected stream set. A successful exit synthesizes one complete message per
//! expected stream so downstream consumers always see a terminal signal, while a failed
//! exit synthesizes nothing.

use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, RunStateResult};
use crate::time::{Clock, EpochMillis, SystemClock};
use crate::types::{Catalog, StreamKey, StreamStatus, StreamStatusEvent, StreamStatusMessage};

/// Exit code of the reporting process, delivered once at finalize time.
pub type ExitCode = i32;

/// Lifecycle of one tracked run.
///
/// The only legal transitions are not-started to tracking via
/// [`CompletionTracker::start_tracking`] and tracking to finalized via
/// [`CompletionTracker::finalize`]. Any call outside that order is a sequencing bug in
/// the orchestrating caller and surfaces as [`ErrorKind::InvalidState`].
#[derive(Debug)]
enum TrackerState {
    NotStarted,
    Tracking(RunProgress),
    Finalized,
}

#[derive(Debug)]
struct RunProgress {
    /// Stream keys from the catalog, in catalog order. Fixed at start.
    expected: Vec<StreamKey>,
    /// Streams that reported a complete status so far.
    reported: HashSet<StreamKey>,
    /// Whether the destination can safely apply a completion-implied refresh signal.
    refreshes_supported: bool,
    /// When tracking started, in epoch milliseconds.
    started_at: EpochMillis,
}

/// Tracks which streams reported completion during one run and reconciles them against
/// the expected stream set when the run ends.
///
/// One tracker instance per run. Cloning is cheap and clones share the same run state, so
/// multiple reporting channels can deliver events through their own handle concurrently;
/// the caller must still serialize [`CompletionTracker::finalize`] after the last
/// [`CompletionTracker::track`] call so it observes a consistent snapshot.
#[derive(Debug, Clone)]
pub struct CompletionTracker<C = SystemClock> {
    clock: C,
    state: Arc<Mutex<TrackerState>>,
}

impl CompletionTracker<SystemClock> {
    /// Creates a tracker driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for CompletionTracker<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CompletionTracker<C> {
    /// Creates a tracker driven by the supplied clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(TrackerState::NotStarted)),
        }
    }

    /// Starts tracking a run over the streams of `catalog`.
    ///
    /// Captures the expected stream set, the destination's refresh capability, and the
    /// current time. Must be called exactly once, before any [`CompletionTracker::track`]
    /// call.
    pub async fn start_tracking(
        &self,
        catalog: &Catalog,
        refreshes_supported: bool,
    ) -> RunStateResult<()> {
        let mut state = self.state.lock().await;

        match *state {
            TrackerState::NotStarted => {}
            TrackerState::Tracking(_) => {
                bail!(
                    ErrorKind::InvalidState,
                    "completion tracking was already started for this run"
                )
            }
            TrackerState::Finalized => {
                bail!(
                    ErrorKind::InvalidState,
                    "completion tracking was already finalized for this run"
                )
            }
        }

        let expected: Vec<StreamKey> = catalog.stream_keys().cloned().collect();

        debug!(
            "started completion tracking for {} streams (refreshes supported: {})",
            expected.len(),
            refreshes_supported
        );

        *state = TrackerState::Tracking(RunProgress {
            expected,
            reported: HashSet::new(),
            refreshes_supported,
            started_at: self.clock.now_millis(),
        });

        Ok(())
    }

    /// Records a status observation from a reporting channel.
    ///
    /// Only a [`StreamStatus::Complete`] status marks a stream as reported; every other
    /// status is observed and ignored. Tracking the same completed stream twice has no
    /// effect beyond the first call, and reports for streams outside the catalog are
    /// accepted since the reporter is not required to be consistent with the catalog.
    pub async fn track(&self, event: StreamStatusEvent) -> RunStateResult<()> {
        let mut state = self.state.lock().await;

        let progress = match &mut *state {
            TrackerState::Tracking(progress) => progress,
            TrackerState::NotStarted => {
                bail!(
                    ErrorKind::InvalidState,
                    "stream status tracked before completion tracking started",
                    event.stream
                )
            }
            TrackerState::Finalized => {
                bail!(
                    ErrorKind::InvalidState,
                    "stream status tracked after completion tracking finalized",
                    event.stream
                )
            }
        };

        let StreamStatusEvent { stream, status } = event;

        if status != StreamStatus::Complete {
            debug!("ignoring {status} status for stream {stream}");
            return Ok(());
        }

        if !progress.reported.insert(stream) {
            debug!("duplicate complete status for an already reported stream");
        }

        Ok(())
    }

    /// Finalizes the run and returns the synthesized completion messages.
    ///
    /// With a zero exit code and a refresh-capable destination, returns one
    /// [`StreamStatus::Complete`] message per expected stream in catalog order, stamped
    /// with the tracking start time and passed through `mapper`. Every expected stream is
    /// re-synthesized whether or not it already reported: the guarantee is that every
    /// expected stream has a terminal signal after a successful run, and downstream
    /// consumption is idempotent per stream.
    ///
    /// A nonzero exit code yields an empty sequence, even for streams that individually
    /// reported complete before the failure. A destination without refresh support also
    /// yields an empty sequence unconditionally.
    ///
    /// May be called at most once per run.
    pub async fn finalize<M>(
        &self,
        exit_code: ExitCode,
        mapper: M,
    ) -> RunStateResult<Vec<StreamStatusMessage>>
    where
        M: FnMut(StreamStatusMessage) -> StreamStatusMessage,
    {
        let mut state = self.state.lock().await;

        let progress = match mem::replace(&mut *state, TrackerState::Finalized) {
            TrackerState::Tracking(progress) => progress,
            TrackerState::NotStarted => {
                *state = TrackerState::NotStarted;
                bail!(
                    ErrorKind::InvalidState,
                    "finalize called before completion tracking started"
                )
            }
            TrackerState::Finalized => {
                bail!(ErrorKind::InvalidState, "finalize called more than once")
            }
        };

        if !progress.refreshes_supported {
            debug!("destination does not support refreshes, skipping synthesized completion");
            return Ok(Vec::new());
        }

        if exit_code != 0 {
            debug!("reporting process exited with code {exit_code}, no streams are complete");
            return Ok(Vec::new());
        }

        debug!(
            "{} of {} expected streams reported complete, synthesizing the full set",
            progress.reported.len(),
            progress.expected.len()
        );

        let started_at = progress.started_at;
        let messages = progress
            .expected
            .into_iter()
            .map(|stream| StreamStatusMessage::completed(stream, started_at))
            .map(mapper)
            .collect();

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use crate::types::{ConfiguredStream, DestinationSyncMode, SyncMode};

    fn catalog() -> Catalog {
        Catalog::new(vec![ConfiguredStream::new(
            StreamKey::new("users".to_string(), None),
            SyncMode::Incremental,
            DestinationSyncMode::Append,
        )])
    }

    fn completed(name: &str) -> StreamStatusEvent {
        StreamStatusEvent::new(
            StreamKey::new(name.to_string(), None),
            StreamStatus::Complete,
        )
    }

    #[tokio::test]
    async fn test_track_before_start_is_invalid() {
        let tracker = CompletionTracker::with_clock(FixedClock(1));

        let err = tracker.track(completed("users")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_double_start_is_invalid() {
        let tracker = CompletionTracker::with_clock(FixedClock(1));

        tracker.start_tracking(&catalog(), true).await.unwrap();
        let err = tracker.start_tracking(&catalog(), true).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_finalize_before_start_is_invalid() {
        let tracker = CompletionTracker::with_clock(FixedClock(1));

        let err = tracker.finalize(0, |message| message).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        // The failed finalize must not consume the run; starting afterwards still works.
        tracker.start_tracking(&catalog(), true).await.unwrap();
    }

    #[tokio::test]
    async fn test_finalize_twice_is_invalid() {
        let tracker = CompletionTracker::with_clock(FixedClock(1));

        tracker.start_tracking(&catalog(), true).await.unwrap();
        tracker.finalize(0, |message| message).await.unwrap();

        let err = tracker.finalize(0, |message| message).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_track_after_finalize_is_invalid() {
        let tracker = CompletionTracker::with_clock(FixedClock(1));

        tracker.start_tracking(&catalog(), true).await.unwrap();
        tracker.finalize(0, |message| message).await.unwrap();

        let err = tracker.track(completed("users")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_clones_share_run_state() {
        let tracker = CompletionTracker::with_clock(FixedClock(42));
        let reporting_handle = tracker.clone();

        tracker.start_tracking(&catalog(), true).await.unwrap();
        reporting_handle.track(completed("users")).await.unwrap();

        let messages = tracker.finalize(0, |message| message).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].emitted_at, 42);
    }
}
