//! In-memory store used by the test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod, PodSpec};
use kombiner_api::{Binding, PlacementRequest};
use parking_lot::Mutex;

use super::{ClusterStore, StoreError};

/// An in-memory stand-in for the cluster API server. Pods, nodes and
/// placement requests live in maps; bindings mutate the stored pod the way
/// the real binding subresource would. Tests can inject binding denials and
/// status-update failures and inspect every write that happened.
#[derive(Default)]
pub struct FakeStore {
    pods: Mutex<HashMap<(String, String), Pod>>,
    nodes: Mutex<Vec<Node>>,
    requests: Mutex<HashMap<(String, String), PlacementRequest>>,
    denied_bindings: Mutex<HashMap<String, String>>,
    fail_status_updates: Mutex<bool>,
    status_updates: Mutex<usize>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pod. An unset namespace defaults to "default".
    pub fn add_pod(&self, pod: Pod) {
        let namespace = pod
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| "default".to_string());
        let name = pod.metadata.name.clone().unwrap_or_default();
        self.pods.lock().insert((namespace, name), pod);
    }

    pub fn add_node(&self, node: Node) {
        self.nodes.lock().push(node);
    }

    /// Makes future bind attempts for the named pod fail with the given
    /// message, as if the control plane denied the binding.
    pub fn deny_binding(&self, pod_name: &str, message: &str) {
        self.denied_bindings
            .lock()
            .insert(pod_name.to_string(), message.to_string());
    }

    /// Makes future status updates fail.
    pub fn fail_status_updates(&self) {
        *self.fail_status_updates.lock() = true;
    }

    /// The node a pod was bound to, if any.
    pub fn bound_node(&self, namespace: &str, pod_name: &str) -> Option<String> {
        self.pods
            .lock()
            .get(&(namespace.to_string(), pod_name.to_string()))
            .and_then(|pod| pod.spec.as_ref())
            .and_then(|spec| spec.node_name.clone())
    }

    /// The last status written for a placement request.
    pub fn placement_request(&self, namespace: &str, name: &str) -> Option<PlacementRequest> {
        self.requests
            .lock()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// How many status updates have been issued so far.
    pub fn status_update_count(&self) -> usize {
        *self.status_updates.lock()
    }
}

#[async_trait]
impl ClusterStore for FakeStore {
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, StoreError> {
        self.pods
            .lock()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "pod",
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn bind_pod(&self, namespace: &str, binding: &Binding) -> Result<(), StoreError> {
        if let Some(message) = self.denied_bindings.lock().get(&binding.pod_name) {
            return Err(StoreError::Api(message.clone()));
        }

        let mut pods = self.pods.lock();
        let pod = pods
            .get_mut(&(namespace.to_string(), binding.pod_name.clone()))
            .ok_or_else(|| StoreError::NotFound {
                kind: "pod",
                namespace: namespace.to_string(),
                name: binding.pod_name.clone(),
            })?;

        let spec = pod.spec.get_or_insert_with(PodSpec::default);
        if let Some(assigned) = spec.node_name.as_deref() {
            if assigned != binding.node_name {
                return Err(StoreError::Api(format!(
                    "pod {} is already assigned to node {}",
                    binding.pod_name, assigned
                )));
            }
        }
        spec.node_name = Some(binding.node_name.clone());
        Ok(())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, StoreError> {
        Ok(self.nodes.lock().clone())
    }

    async fn update_placement_request_status(
        &self,
        pr: &PlacementRequest,
    ) -> Result<PlacementRequest, StoreError> {
        *self.status_updates.lock() += 1;

        if *self.fail_status_updates.lock() {
            return Err(StoreError::Api("status update failed".to_string()));
        }

        let namespace = pr
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| "default".to_string());
        let name = pr.metadata.name.clone().unwrap_or_default();
        self.requests
            .lock()
            .insert((namespace, name), pr.clone());
        Ok(pr.clone())
    }
}
