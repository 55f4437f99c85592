#![allow(dead_code)]

//! Shared builders for run-state tests, mirroring the catalogs and fixtures the
//! scenarios exercise.

use etl_run_state::types::{
    Catalog, ConfiguredStream, DestinationSyncMode, RefreshRequest, RefreshType,
    StreamGeneration, StreamKey, StreamStatus, StreamStatusEvent, SyncMode,
};

pub fn key(name: &str, namespace: Option<&str>) -> StreamKey {
    StreamKey::new(name.to_string(), namespace.map(str::to_string))
}

pub fn configured(
    name: &str,
    namespace: Option<&str>,
    sync_mode: SyncMode,
    destination_sync_mode: DestinationSyncMode,
) -> ConfiguredStream {
    ConfiguredStream::new(key(name, namespace), sync_mode, destination_sync_mode)
}

pub fn incremental_append(name: &str, namespace: Option<&str>) -> ConfiguredStream {
    configured(
        name,
        namespace,
        SyncMode::Incremental,
        DestinationSyncMode::Append,
    )
}

pub fn full_refresh(
    name: &str,
    namespace: Option<&str>,
    destination_sync_mode: DestinationSyncMode,
) -> ConfiguredStream {
    configured(name, namespace, SyncMode::FullRefresh, destination_sync_mode)
}

pub fn generation(name: &str, namespace: Option<&str>, generation_id: u64) -> StreamGeneration {
    StreamGeneration::new(key(name, namespace), generation_id)
}

/// Generation history shared by most assigner scenarios: three streams at generations
/// one, three, and two.
pub fn generation_history() -> Vec<StreamGeneration> {
    vec![
        generation("name1", Some("namespace1"), 1),
        generation("name2", Some("namespace1"), 3),
        generation("name2", Some("namespace2"), 2),
    ]
}

pub fn truncate(name: &str, namespace: Option<&str>) -> RefreshRequest {
    RefreshRequest::new(key(name, namespace), RefreshType::Truncate)
}

pub fn merge(name: &str, namespace: Option<&str>) -> RefreshRequest {
    RefreshRequest::new(key(name, namespace), RefreshType::Merge)
}

/// Two-stream catalog used by the completion tracker scenarios: one bare stream and one
/// namespaced stream.
pub fn tracked_catalog() -> Catalog {
    Catalog::new(vec![
        incremental_append("name1", None),
        incremental_append("name2", Some("namespace2")),
    ])
}

pub fn completed(name: &str, namespace: Option<&str>) -> StreamStatusEvent {
    StreamStatusEvent::new(key(name, namespace), StreamStatus::Complete)
}

pub fn status(name: &str, namespace: Option<&str>, status: StreamStatus) -> StreamStatusEvent {
    StreamStatusEvent::new(key(name, namespace), status)
}
