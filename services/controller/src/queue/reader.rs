//! Abstraction over the queue reading strategies.

use std::sync::Arc;

use kombiner_api::PlacementRequest;

use super::config::QueueConfigs;

/// A reader decides the order in which requests are drawn from a set of
/// queues. Readers return `None` when there is nothing to read at the
/// moment, which the iterator takes as its cue to wait for new pushes.
pub trait Reader: Send {
    fn read(&mut self) -> Option<PlacementRequest>;
}

/// Builds a fresh reader for a list of queues. The iterator calls the
/// factory on every drain pass so per-reader state (quota counters,
/// candidate sets) starts clean each time.
pub type ReaderFactory = Arc<dyn Fn(&QueueConfigs) -> Box<dyn Reader> + Send + Sync>;
