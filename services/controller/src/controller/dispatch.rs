//! The dispatch loop: validate, bind, record the outcome.

use std::collections::HashMap;
use std::sync::Arc;

use kombiner_api::{
    helpers, PlacementRequest, PlacementRequestResult, PlacementRequestStatus,
};
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::plugins::{self, NodeInfo};
use crate::store::{ClusterStore, StoreError};

use super::profiles::Profiles;
use super::ControllerError;

/// Consumes selected placement requests and drives each one to a terminal
/// status.
pub struct Dispatcher {
    store: Arc<dyn ClusterStore>,
    profiles: Profiles,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn ClusterStore>, profiles: Profiles) -> Self {
        Self { store, profiles }
    }

    /// Processes requests from the iterator output until the channel closes
    /// or the token is cancelled. Scheduling failures are logged, not
    /// retried; the watch re-delivers the request and the terminal-status
    /// check keeps the dispatch idempotent.
    pub async fn run(
        &self,
        mut next: Receiver<PlacementRequest>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                received = next.recv() => match received {
                    Some(pr) => {
                        if let Err(err) = self.schedule_one(pr).await {
                            error!(error = %err, "failed to schedule");
                        }
                    }
                    None => return,
                }
            }
        }
    }

    /// Evaluates a single placement request and binds its pods to the
    /// nominated nodes, then writes the resulting status.
    pub async fn schedule_one(&self, mut pr: PlacementRequest) -> Result<(), ControllerError> {
        let name = pr.metadata.name.clone().unwrap_or_default();
        let namespace = pr.metadata.namespace.clone().unwrap_or_default();
        debug!(name = %name, namespace = %namespace, "processing placement request");

        // deleted requests and requests that already reached a terminal
        // result are never processed again.
        if pr.metadata.deletion_timestamp.is_some() || helpers::result(&pr).is_terminal() {
            debug!(name = %name, namespace = %namespace, "skipping placement request");
            return Ok(());
        }

        if let Err(err) = helpers::validate(&pr) {
            warn!(name = %name, namespace = %namespace, error = %err, "placement request is not valid");
            let status = pr.status.get_or_insert_with(PlacementRequestStatus::default);
            status.result = PlacementRequestResult::Rejected;
            status.message = err.to_string();
            self.update_status(&pr).await?;
            return Ok(());
        }

        // refresh the node snapshot only when this scheduler actually has
        // validation plugins configured.
        let validators = self
            .profiles
            .get(&pr.spec.scheduler_name)
            .map(|profile| profile.plugins.as_slice())
            .unwrap_or_default();
        let node_infos: HashMap<String, NodeInfo> = if validators.is_empty() {
            HashMap::new()
        } else {
            self.store
                .list_nodes()
                .await?
                .into_iter()
                .filter_map(|node| {
                    node.metadata
                        .name
                        .clone()
                        .map(|name| (name, NodeInfo { node }))
                })
                .collect()
        };

        let bindings = pr.spec.bindings.clone();
        'bindings: for binding in &bindings {
            debug!(
                name = %name,
                namespace = %namespace,
                pod = %binding.pod_name,
                node = %binding.node_name,
                "attempting to bind pod to node"
            );

            let pod = match self.store.get_pod(&namespace, &binding.pod_name).await {
                Ok(pod) => pod,
                Err(err) => {
                    warn!(pod = %binding.pod_name, error = %err, "failed to get pod");
                    let message = format!("Failed to get pod {}: {}", binding.pod_name, err);
                    helpers::set_binding_failure(&mut pr, binding, "API error", &message);
                    continue;
                }
            };

            let assigned = pod
                .spec
                .as_ref()
                .and_then(|spec| spec.node_name.as_deref())
                .unwrap_or_default();
            if !assigned.is_empty() {
                if assigned == binding.node_name {
                    helpers::set_binding_success(
                        &mut pr,
                        binding,
                        "Binding unneeded",
                        "Pod was already bound",
                    );
                } else {
                    let message = format!("Pod {} bound to a different node", binding.pod_name);
                    helpers::set_binding_failure(&mut pr, binding, "Pod already bound", &message);
                }
                continue;
            }

            // all enabled plugins have to pass. the first failure marks the
            // binding and ends the whole binding loop; the remaining
            // bindings are left without a status entry.
            for plugin in validators {
                let Some(node_info) = node_infos.get(&binding.node_name) else {
                    let message = format!("no node info for node {}", binding.node_name);
                    warn!(pod = %binding.pod_name, node = %binding.node_name, "validation failed");
                    helpers::set_binding_failure(&mut pr, binding, "validation failed", &message);
                    break 'bindings;
                };
                if let Err(err) = plugins::run_plugin_validation(plugin.as_ref(), &pod, node_info)
                {
                    warn!(
                        plugin = %plugin.name(),
                        pod = %binding.pod_name,
                        error = %err,
                        "validation failed"
                    );
                    helpers::set_binding_failure(
                        &mut pr,
                        binding,
                        "validation failed",
                        &err.to_string(),
                    );
                    break 'bindings;
                }
            }

            if let Err(err) = self.store.bind_pod(&namespace, binding).await {
                warn!(
                    pod = %binding.pod_name,
                    node = %binding.node_name,
                    error = %err,
                    "failed to bind pod to node"
                );
                helpers::set_binding_failure(&mut pr, binding, "API denied binding", &err.to_string());
                continue;
            }

            debug!(pod = %binding.pod_name, node = %binding.node_name, "pod successfully bound to node");
            helpers::set_binding_success(&mut pr, binding, "Binding successful", "Pod successfully bound");
        }

        let (result, message) = helpers::assess_result(&pr);
        let status = pr.status.get_or_insert_with(PlacementRequestStatus::default);
        status.result = result;
        status.message = message;
        self.update_status(&pr).await?;

        debug!(name = %name, namespace = %namespace, "placement request processed");
        Ok(())
    }

    async fn update_status(&self, pr: &PlacementRequest) -> Result<(), ControllerError> {
        self.store
            .update_placement_request_status(pr)
            .await
            .map(|_| ())
            .map_err(|err: StoreError| ControllerError::StatusUpdate(err))
    }
}
