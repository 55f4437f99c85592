//! Common types used throughout run-state tracking.
//!
//! Re-exports the catalog, refresh-request, and stream-status types shared by the
//! generation assigner and the completion tracker.

mod catalog;
mod refresh;
mod status;

pub use catalog::*;
pub use refresh::*;
pub use status::*;
