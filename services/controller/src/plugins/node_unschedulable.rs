//! Rejects bindings onto cordoned nodes.

use k8s_openapi::api::core::v1::Pod;

use super::{NodeInfo, PluginRejection, ValidationPlugin};

pub(super) const NAME: &str = "NodeUnschedulable";

/// Taint key the kubelet places on cordoned nodes; a pod tolerating it is
/// allowed through.
const UNSCHEDULABLE_TAINT_KEY: &str = "node.kubernetes.io/unschedulable";

pub struct NodeUnschedulable;

impl ValidationPlugin for NodeUnschedulable {
    fn name(&self) -> &'static str {
        NAME
    }

    fn filter(&self, pod: &Pod, node_info: &NodeInfo) -> Result<(), PluginRejection> {
        let unschedulable = node_info
            .node
            .spec
            .as_ref()
            .and_then(|spec| spec.unschedulable)
            .unwrap_or(false);
        if !unschedulable {
            return Ok(());
        }

        let tolerated = pod
            .spec
            .as_ref()
            .and_then(|spec| spec.tolerations.as_ref())
            .map(|tolerations| {
                tolerations
                    .iter()
                    .any(|t| t.key.as_deref() == Some(UNSCHEDULABLE_TAINT_KEY))
            })
            .unwrap_or(false);
        if tolerated {
            return Ok(());
        }

        Err(PluginRejection(format!(
            "node {} is unschedulable",
            node_info.node.metadata.name.as_deref().unwrap_or_default()
        )))
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::Toleration;

    use super::super::{run_plugin_validation, testing};
    use super::*;

    #[test]
    fn accepts_schedulable_nodes() {
        let node_info = NodeInfo {
            node: testing::node("node-1", false),
        };
        assert!(
            run_plugin_validation(&NodeUnschedulable, &testing::pod("pod-a"), &node_info).is_ok()
        );
    }

    #[test]
    fn rejects_cordoned_nodes() {
        let node_info = NodeInfo {
            node: testing::node("node-1", true),
        };
        assert!(
            run_plugin_validation(&NodeUnschedulable, &testing::pod("pod-a"), &node_info).is_err()
        );
    }

    #[test]
    fn tolerating_pods_pass_cordoned_nodes() {
        let mut pod = testing::pod("pod-a");
        pod.spec.as_mut().unwrap().tolerations = Some(vec![Toleration {
            key: Some("node.kubernetes.io/unschedulable".to_string()),
            operator: Some("Exists".to_string()),
            ..Default::default()
        }]);

        let node_info = NodeInfo {
            node: testing::node("node-1", true),
        };
        assert!(run_plugin_validation(&NodeUnschedulable, &pod, &node_info).is_ok());
    }
}
