//! Per-scheduler validation plugin profiles.

use std::collections::HashMap;
use std::sync::Arc;

use kombiner_api::{Configuration, Plugins};
use tracing::warn;

use crate::plugins::{self, ValidationPlugin};

/// The validation plugins enabled for a single scheduler queue.
pub struct QueueProfile {
    pub plugins: Vec<Arc<dyn ValidationPlugin>>,
}

/// Profiles keyed by scheduler name.
pub type Profiles = HashMap<String, QueueProfile>;

/// Resolves the configured plugin names against the built-in registry, one
/// profile per declared queue. A queue without its own plugin configuration
/// inherits the cluster-wide one. Unknown plugin names are skipped.
pub fn from_configuration(cfg: &Configuration) -> Profiles {
    let registry = plugins::registry();
    let mut profiles = Profiles::new();

    for queue in &cfg.queues {
        let effective: &Plugins = if queue.plugins.is_empty() {
            &cfg.plugins
        } else {
            &queue.plugins
        };

        let mut enabled = Vec::new();
        for name in &effective.validate.enabled {
            if effective.validate.disabled.contains(name) {
                continue;
            }
            match registry.get(name.as_str()) {
                Some(plugin) => enabled.push(Arc::clone(plugin)),
                None => warn!(
                    plugin = %name,
                    scheduler = %queue.scheduler_name,
                    "ignoring unknown validation plugin"
                ),
            }
        }

        profiles.insert(queue.scheduler_name.clone(), QueueProfile { plugins: enabled });
    }

    profiles
}
