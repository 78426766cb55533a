//! Verifies that a pod pinned to a node by name lands on that node.

use k8s_openapi::api::core::v1::Pod;

use super::{NodeInfo, PluginRejection, PreFilterOutcome, ValidationPlugin};

pub(super) const NAME: &str = "NodeName";

pub struct NodeName;

impl ValidationPlugin for NodeName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn pre_filter(&self, pod: &Pod) -> Result<PreFilterOutcome, PluginRejection> {
        match pod.spec.as_ref().and_then(|spec| spec.node_name.as_deref()) {
            None | Some("") => Ok(PreFilterOutcome::Skip),
            Some(_) => Ok(PreFilterOutcome::Proceed),
        }
    }

    fn filter(&self, pod: &Pod, node_info: &NodeInfo) -> Result<(), PluginRejection> {
        let wanted = pod
            .spec
            .as_ref()
            .and_then(|spec| spec.node_name.as_deref())
            .unwrap_or_default();
        let evaluated = node_info.node.metadata.name.as_deref().unwrap_or_default();

        if wanted == evaluated {
            return Ok(());
        }
        Err(PluginRejection(format!(
            "pod is pinned to node {wanted} but was nominated for node {evaluated}"
        )))
    }
}
