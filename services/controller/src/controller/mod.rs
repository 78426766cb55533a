//! The placement request controller.
//!
//! Wires the queue stack to the external store: an admission handler fed by
//! the watch pushes requests into per-scheduler queues, the iterator draws
//! them back out under the configured fairness policy, and the dispatcher
//! drives each one to a terminal status.

mod admission;
mod dispatch;
mod options;
pub mod profiles;
mod watch;

pub use admission::Admission;
pub use dispatch::Dispatcher;
pub use options::Options;
pub use profiles::{Profiles, QueueProfile};
pub use watch::watch_placement_requests;

use std::sync::Arc;

use kombiner_api::{Configuration, FairnessAlgorithm, PlacementRequest};
use thiserror::Error;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::queue::{
    QueueConfigError, QueueConfigs, QueueIterator, RoundRobinReader, UniformReader,
};
use crate::store::{ClusterStore, StoreError};

/// Errors surfaced by the controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("invalid queue configuration: {0}")]
    QueueConfig(#[from] QueueConfigError),

    #[error("failed to update placement request status: {0}")]
    StatusUpdate(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The controller: admission on one side, iterator plus dispatcher on the
/// other, all sharing the per-scheduler queues.
pub struct PlacementRequestController {
    admission: Admission,
    dispatcher: Dispatcher,
    iterator: QueueIterator,
    next: Receiver<PlacementRequest>,
}

impl PlacementRequestController {
    /// Builds a controller from the loaded configuration: one queue per
    /// declared scheduler, the fairness algorithm the configuration names
    /// (round-robin unless it says otherwise), and a validation profile per
    /// queue.
    pub fn new(
        cfg: &Configuration,
        store: Arc<dyn ClusterStore>,
        options: Options,
    ) -> Result<Self, ControllerError> {
        let configs = QueueConfigs::from_configuration(cfg);
        let (iterator, next) = QueueIterator::new(configs.clone())?;

        let iterator = match cfg.fairness_algorithm {
            FairnessAlgorithm::RoundRobin => {
                info!("using the round-robin fairness algorithm");
                iterator.with_reader_factory(Arc::new(|configs| {
                    Box::new(RoundRobinReader::new(configs))
                }))
            }
            FairnessAlgorithm::Uniform => {
                info!("using the uniform fairness algorithm");
                iterator
                    .with_reader_factory(Arc::new(|configs| Box::new(UniformReader::new(configs))))
            }
        };

        let admission = Admission::new(
            Arc::new(configs.to_map()),
            Arc::clone(&store),
            options.try_to_reject_timeout,
        );
        let dispatcher = Dispatcher::new(store, profiles::from_configuration(cfg));

        Ok(Self {
            admission,
            dispatcher,
            iterator,
            next,
        })
    }

    /// A handle for the watch task to admit requests through.
    pub fn admission(&self) -> Admission {
        self.admission.clone()
    }

    /// Runs the iterator in a background task and consumes its output on
    /// the foreground until the token is cancelled. Queued requests are not
    /// drained on the way out; the watch re-delivers them on the next
    /// start.
    pub async fn run(self, shutdown: CancellationToken) {
        let Self {
            dispatcher,
            iterator,
            next,
            ..
        } = self;

        let iterator_task = tokio::spawn(iterator.run(shutdown.clone()));
        dispatcher.run(next, shutdown).await;
        let _ = iterator_task.await;
    }
}
