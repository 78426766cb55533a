//! Validation plugins run against a node snapshot before binding.
//!
//! A plugin exposes a prefilter step (which may skip the plugin entirely
//! for a pod) and a filter step judging a concrete pod/node pair. The
//! dispatcher runs every enabled plugin for a binding; the first failure
//! marks the binding as failed validation.

use std::collections::HashMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::{Node, Pod};
use thiserror::Error;

mod node_name;
mod node_unschedulable;

pub use node_name::NodeName;
pub use node_unschedulable::NodeUnschedulable;

/// Snapshot entry for a single node, refreshed from the external store at
/// the start of a validation pass.
#[derive(Clone, Debug)]
pub struct NodeInfo {
    pub node: Node,
}

/// A plugin's veto, written into the binding status message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct PluginRejection(pub String);

/// Outcome of the prefilter step.
#[derive(Debug, PartialEq, Eq)]
pub enum PreFilterOutcome {
    /// Run the filter step for this pod.
    Proceed,
    /// The plugin has nothing to say about this pod; counts as a pass.
    Skip,
}

pub trait ValidationPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn pre_filter(&self, _pod: &Pod) -> Result<PreFilterOutcome, PluginRejection> {
        Ok(PreFilterOutcome::Proceed)
    }

    fn filter(&self, pod: &Pod, node_info: &NodeInfo) -> Result<(), PluginRejection>;
}

/// The built-in plugins, keyed by the names used in the configuration.
pub fn registry() -> HashMap<&'static str, Arc<dyn ValidationPlugin>> {
    let mut plugins: HashMap<&'static str, Arc<dyn ValidationPlugin>> = HashMap::new();
    plugins.insert(node_name::NAME, Arc::new(NodeName));
    plugins.insert(node_unschedulable::NAME, Arc::new(NodeUnschedulable));
    plugins
}

/// Runs a single plugin against a pod/node pair: prefilter first (a skip
/// counts as a pass), then filter.
pub fn run_plugin_validation(
    plugin: &dyn ValidationPlugin,
    pod: &Pod,
    node_info: &NodeInfo,
) -> Result<(), PluginRejection> {
    match plugin.pre_filter(pod)? {
        PreFilterOutcome::Skip => Ok(()),
        PreFilterOutcome::Proceed => plugin.filter(pod, node_info),
    }
}
