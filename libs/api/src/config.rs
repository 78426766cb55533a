//! Controller configuration schema.
//!
//! Loaded from a YAML file at startup with strict decoding; unknown fields
//! are a startup error. Validation beyond shape (duplicate scheduler names,
//! positive weights) lives with the controller.

use serde::{Deserialize, Serialize};

/// Algorithm used to arbitrate between the per-scheduler queues.
///
/// An absent or empty value selects round-robin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum FairnessAlgorithm {
    #[default]
    #[serde(alias = "")]
    RoundRobin,
    Uniform,
}

/// Top-level controller configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Configuration {
    /// Per-scheduler queue declarations.
    pub queues: Vec<Queue>,

    /// How the dispatcher distributes its bandwidth across the queues.
    #[serde(default)]
    pub fairness_algorithm: FairnessAlgorithm,

    /// Cluster-wide plugin configuration, applied to queues that do not
    /// declare their own.
    #[serde(default)]
    pub plugins: Plugins,
}

/// A single scheduler queue declaration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Queue {
    /// Targets placement requests from a specific scheduler (or profile).
    pub scheduler_name: String,

    /// How often this scheduler's requests get dispatched relative to the
    /// other schedulers. Proportional to the sum of all weights.
    pub weight: u32,

    /// Upper bound on the number of pod-to-node assignments a single
    /// placement request may carry.
    pub max_size: usize,

    /// Validation plugins applied to this queue's requests before binding.
    #[serde(default)]
    pub plugins: Plugins,
}

/// Plugin configuration at either cluster or queue level.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Plugins {
    /// Enabled/disabled validate extension points.
    #[serde(default)]
    pub validate: PluginSet,
}

impl Plugins {
    /// True when no plugin names are configured at all.
    pub fn is_empty(&self) -> bool {
        self.validate.enabled.is_empty() && self.validate.disabled.is_empty()
    }
}

/// Lists of enabled and disabled plugins.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginSet {
    #[serde(default)]
    pub enabled: Vec<String>,

    #[serde(default)]
    pub disabled: Vec<String>,
}
