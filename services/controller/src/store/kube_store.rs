//! Cluster API server backed store.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Binding as PodBinding, Node, ObjectReference, Pod};
use kube::api::{Api, ListParams, ObjectMeta, PostParams};
use kube::Client;
use kombiner_api::{Binding, PlacementRequest};

use super::{ClusterStore, StoreError};

/// Production store talking to the cluster API server through a shared
/// client.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Maps a client error onto the store error surface, turning 404 responses
/// into typed not-found errors.
fn convert(err: kube::Error, kind: &'static str, namespace: &str, name: &str) -> StoreError {
    match err {
        kube::Error::Api(response) if response.code == 404 => StoreError::NotFound {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        other => StoreError::Api(other.to_string()),
    }
}

#[async_trait]
impl ClusterStore for KubeStore {
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, StoreError> {
        self.pods(namespace)
            .get(name)
            .await
            .map_err(|err| convert(err, "pod", namespace, name))
    }

    async fn bind_pod(&self, namespace: &str, binding: &Binding) -> Result<(), StoreError> {
        let body = PodBinding {
            metadata: ObjectMeta {
                name: Some(binding.pod_name.clone()),
                namespace: Some(namespace.to_string()),
                uid: Some(binding.pod_uid.clone()),
                ..Default::default()
            },
            target: ObjectReference {
                kind: Some("Node".to_string()),
                name: Some(binding.node_name.clone()),
                ..Default::default()
            },
        };

        let data = serde_json::to_vec(&body).map_err(|err| StoreError::Internal(err.to_string()))?;
        self.pods(namespace)
            .create_subresource::<PodBinding>(
                "binding",
                &binding.pod_name,
                &PostParams::default(),
                data,
            )
            .await
            .map_err(|err| convert(err, "pod", namespace, &binding.pod_name))?;
        Ok(())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, StoreError> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes
            .list(&ListParams::default())
            .await
            .map_err(|err| StoreError::Api(err.to_string()))?;
        Ok(list.items)
    }

    async fn update_placement_request_status(
        &self,
        pr: &PlacementRequest,
    ) -> Result<PlacementRequest, StoreError> {
        let name = pr
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| StoreError::Internal("placement request has no name".to_string()))?;
        let namespace = pr
            .metadata
            .namespace
            .as_deref()
            .ok_or_else(|| StoreError::Internal("placement request has no namespace".to_string()))?;

        let api: Api<PlacementRequest> = Api::namespaced(self.client.clone(), namespace);
        let data = serde_json::to_vec(pr).map_err(|err| StoreError::Internal(err.to_string()))?;
        api.replace_status(name, &PostParams::default(), data)
            .await
            .map_err(|err| convert(err, "placementrequest", namespace, name))
    }
}
