//! Per-scheduler queue descriptors used by the iterator and its readers.

use std::collections::HashMap;
use std::sync::Arc;

use kombiner_api::{Configuration, Queue};
use thiserror::Error;

use super::placement_request::PlacementRequestQueue;

/// Errors raised while validating queue configurations.
#[derive(Debug, Error)]
pub enum QueueConfigError {
    #[error("queue name cannot be empty")]
    EmptyName,

    #[error("queue weight must be greater than zero")]
    ZeroWeight,

    #[error("queue max size must be greater than zero")]
    ZeroMaxSize,

    #[error("duplicate config for scheduler {0:?}")]
    Duplicate(String),

    #[error("invalid config for scheduler {0:?}: {1}")]
    Invalid(String, Box<QueueConfigError>),
}

/// Configuration for a single queue in the queue iterator: the declared
/// queue settings plus the queue itself. The weight determines how often
/// the queue is drawn from, proportionally to the sum of all weights.
#[derive(Clone)]
pub struct QueueConfig {
    pub queue: Queue,
    pub queue_ref: Arc<PlacementRequestQueue>,
}

impl QueueConfig {
    /// Checks this config for correctness: a non-empty scheduler name, a
    /// weight greater than zero and a max size greater than zero.
    pub fn validate(&self) -> Result<(), QueueConfigError> {
        if self.queue.scheduler_name.is_empty() {
            return Err(QueueConfigError::EmptyName);
        }
        if self.queue.weight == 0 {
            return Err(QueueConfigError::ZeroWeight);
        }
        if self.queue.max_size == 0 {
            return Err(QueueConfigError::ZeroMaxSize);
        }
        Ok(())
    }
}

/// A list of QueueConfig objects, useful for batch operations over all the
/// queues at once.
#[derive(Clone, Default)]
pub struct QueueConfigs(Vec<QueueConfig>);

impl QueueConfigs {
    /// Instantiates one PlacementRequestQueue per queue declared in the
    /// controller configuration. No validation is performed at this stage.
    pub fn from_configuration(cfg: &Configuration) -> Self {
        Self(
            cfg.queues
                .iter()
                .map(|queue| QueueConfig {
                    queue: queue.clone(),
                    queue_ref: Arc::new(PlacementRequestQueue::new()),
                })
                .collect(),
        )
    }

    /// Converts the configs to a map keyed by scheduler name. Later entries
    /// for the same name overwrite earlier ones.
    pub fn to_map(&self) -> HashMap<String, QueueConfig> {
        self.0
            .iter()
            .map(|cfg| (cfg.queue.scheduler_name.clone(), cfg.clone()))
            .collect()
    }

    /// Registers the same push handler on every queue.
    pub fn add_push_handler(&self, handler: impl Fn() + Send + Sync + Clone + 'static) {
        for config in &self.0 {
            config.queue_ref.add_push_handler(handler.clone());
        }
    }

    /// Checks every config for correctness and rejects duplicate scheduler
    /// names.
    pub fn validate(&self) -> Result<(), QueueConfigError> {
        let mut seen = std::collections::HashSet::new();
        for config in &self.0 {
            let name = config.queue.scheduler_name.clone();
            if !seen.insert(name.clone()) {
                return Err(QueueConfigError::Duplicate(name));
            }
            config
                .validate()
                .map_err(|err| QueueConfigError::Invalid(name, Box::new(err)))?;
        }
        Ok(())
    }
}

impl From<Vec<QueueConfig>> for QueueConfigs {
    fn from(configs: Vec<QueueConfig>) -> Self {
        Self(configs)
    }
}

impl std::ops::Deref for QueueConfigs {
    type Target = [QueueConfig];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
