//! Generation and sync-id assignment for run planning.
//!
//! Before a run starts, every stream in the catalog is stamped with the generation it will
//! produce, the minimum generation the destination must keep, and the run's sync id. The
//! assignment is a pure function of the catalog, the prior generation history, and the
//! refresh requests for the run; callers get back an updated catalog and the inputs are
//! never mutated in place.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::types::{
    Catalog, DestinationSyncMode, GenerationId, JobId, RefreshRequest, RefreshType,
    StreamGeneration, StreamKey, SyncMode,
};

/// Stamps generation and sync information onto every stream in the catalog.
///
/// A stream advances to a new generation when this run replaces its data: an explicit
/// [`RefreshType::Truncate`] or [`RefreshType::Merge`] request, or a full refresh into an
/// overwrite destination mode. Everything else keeps its prior generation. The minimum
/// generation is set equal to the new generation on full-truncate paths and zero
/// otherwise; a merge request forces it back to zero even though the generation advances.
///
/// A refresh request targeting a stream takes precedence over that stream's mode-derived
/// default. Requests naming streams absent from the catalog are ignored, and streams with
/// no history entry start from generation zero.
pub fn assign(
    mut catalog: Catalog,
    job_id: JobId,
    refreshes: &[RefreshRequest],
    history: &[StreamGeneration],
) -> Catalog {
    let prior = prior_generations(history);

    for configured in &mut catalog.streams {
        let prior_generation = prior.get(&configured.stream).copied().unwrap_or(0);

        // First matching request wins if the caller sent duplicates for one stream.
        let refresh = refreshes
            .iter()
            .find(|request| request.stream == configured.stream);

        let (generation_id, minimum_generation_id) = match refresh {
            Some(request) => match request.refresh_type {
                RefreshType::Truncate => (prior_generation + 1, prior_generation + 1),
                RefreshType::Merge => (prior_generation + 1, 0),
            },
            None => match (configured.sync_mode, configured.destination_sync_mode) {
                (
                    SyncMode::FullRefresh,
                    DestinationSyncMode::Overwrite | DestinationSyncMode::OverwriteDedup,
                ) => (prior_generation + 1, prior_generation + 1),
                _ => (prior_generation, 0),
            },
        };

        configured.generation_id = Some(generation_id);
        configured.minimum_generation_id = Some(minimum_generation_id);
        configured.sync_id = Some(job_id);
    }

    debug!(
        "assigned generation and sync ids to {} streams for job {}",
        catalog.streams.len(),
        job_id
    );

    catalog
}

/// Stamps generation and sync information for a clear operation.
///
/// Streams in `cleared` advance to a new generation with the minimum generation set equal
/// to it, regardless of their configured modes. All other streams keep their prior
/// generation with a minimum of zero.
pub fn assign_for_clear(
    mut catalog: Catalog,
    job_id: JobId,
    cleared: &HashSet<StreamKey>,
    history: &[StreamGeneration],
) -> Catalog {
    let prior = prior_generations(history);

    for configured in &mut catalog.streams {
        let prior_generation = prior.get(&configured.stream).copied().unwrap_or(0);

        let (generation_id, minimum_generation_id) = if cleared.contains(&configured.stream) {
            (prior_generation + 1, prior_generation + 1)
        } else {
            (prior_generation, 0)
        };

        configured.generation_id = Some(generation_id);
        configured.minimum_generation_id = Some(minimum_generation_id);
        configured.sync_id = Some(job_id);
    }

    debug!(
        "assigned generation and sync ids for clear of {} streams in job {}",
        cleared.len(),
        job_id
    );

    catalog
}

/// Collapses the generation history into one prior generation per stream.
///
/// A well-formed history has at most one record per stream. If duplicates are present the
/// maximum generation id wins, so the outcome does not depend on record order.
fn prior_generations(history: &[StreamGeneration]) -> HashMap<&StreamKey, GenerationId> {
    let mut prior = HashMap::new();

    for record in history {
        prior
            .entry(&record.stream)
            .and_modify(|generation_id| {
                if record.generation_id > *generation_id {
                    *generation_id = record.generation_id;
                }
            })
            .or_insert(record.generation_id);
    }

    prior
}
