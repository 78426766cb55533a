//! External-store facade.
//!
//! The controller talks to the cluster through this narrow interface: pod
//! lookup, pod binding, node listing for validation snapshots, and status
//! updates on placement requests. Production wires it to the cluster API
//! server; tests wire it to an in-memory fake.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use kombiner_api::{Binding, PlacementRequest};
use thiserror::Error;

mod fake;
mod kube_store;

pub use fake::FakeStore;
pub use kube_store::KubeStore;

/// Errors surfaced by the external store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced object does not exist.
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    /// The control plane refused or failed the request.
    #[error("api error: {0}")]
    Api(String),

    /// Something went wrong on our side of the wire.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Access to the cluster state the controller needs. All methods are safe
/// to call concurrently.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Fetches a pod by namespace and name.
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, StoreError>;

    /// Binds the pod named in the binding to its nominated node.
    async fn bind_pod(&self, namespace: &str, binding: &Binding) -> Result<(), StoreError>;

    /// Lists the cluster nodes for a validation snapshot.
    async fn list_nodes(&self) -> Result<Vec<Node>, StoreError>;

    /// Persists the status subresource of a placement request.
    async fn update_placement_request_status(
        &self,
        pr: &PlacementRequest,
    ) -> Result<PlacementRequest, StoreError>;
}
