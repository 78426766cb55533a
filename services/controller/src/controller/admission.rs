//! Admission of freshly created placement requests into the queues.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use kombiner_api::{PlacementRequest, PlacementRequestResult, PlacementRequestStatus};
use tracing::{debug, warn};

use crate::queue::QueueConfig;
use crate::store::ClusterStore;

/// Routes placement requests seen on the watch into the queue configured
/// for their scheduler, or rejects them up front. Cheap to clone; the watch
/// task holds its own copy.
#[derive(Clone)]
pub struct Admission {
    queues: Arc<HashMap<String, QueueConfig>>,
    store: Arc<dyn ClusterStore>,
    reject_timeout: Duration,
}

impl Admission {
    pub(crate) fn new(
        queues: Arc<HashMap<String, QueueConfig>>,
        store: Arc<dyn ClusterStore>,
        reject_timeout: Duration,
    ) -> Self {
        Self {
            queues,
            store,
            reject_timeout,
        }
    }

    /// Handles a newly created placement request. There may be more events
    /// right behind this one, so anything slow (the rejection writes) runs
    /// under a bounded deadline.
    pub async fn admit(&self, pr: PlacementRequest) {
        if pr.spec.scheduler_name.is_empty() {
            debug!("dropping placement request without a scheduler name");
            return;
        }

        let Some(config) = self.queues.get(&pr.spec.scheduler_name) else {
            self.try_to_reject(pr, "QueueNotFound", "Scheduler queue not found")
                .await;
            return;
        };

        if pr.spec.bindings.len() > config.queue.max_size {
            self.try_to_reject(pr, "PlacementRequestTooLarge", "Placement request too large")
                .await;
            return;
        }

        config.queue_ref.push(pr);
    }

    /// Best-effort rejection of a placement request. Runs under its own
    /// deadline, independent of any caller context; failures are logged and
    /// swallowed since the watch will re-deliver the request and it will be
    /// re-rejected.
    pub(crate) async fn try_to_reject(&self, mut pr: PlacementRequest, reason: &str, message: &str) {
        let name = pr.metadata.name.clone().unwrap_or_default();
        let namespace = pr.metadata.namespace.clone().unwrap_or_default();
        debug!(name = %name, namespace = %namespace, reason = %reason, "trying to reject placement request");

        let status = pr.status.get_or_insert_with(PlacementRequestStatus::default);
        status.result = PlacementRequestResult::Rejected;
        status.reason = reason.to_string();
        status.message = message.to_string();

        match tokio::time::timeout(
            self.reject_timeout,
            self.store.update_placement_request_status(&pr),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                warn!(name = %name, namespace = %namespace, error = %err, "failed to reject placement request");
            }
            Err(_) => {
                warn!(name = %name, namespace = %namespace, "timed out rejecting placement request");
            }
        }
    }
}
