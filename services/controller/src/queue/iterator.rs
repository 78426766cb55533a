//! Iterates over the per-scheduler queues in fair order.

use std::sync::Arc;

use kombiner_api::PlacementRequest;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::config::{QueueConfigError, QueueConfigs};
use super::reader::ReaderFactory;
use super::uniform::UniformReader;

/// Pops PlacementRequests from multiple queues respecting their weights and
/// emits them on a single output channel.
///
/// Construction registers a resume handler on every queue so a push on any
/// of them wakes the iterator up. The reading order is delegated to a
/// reader built fresh on each drain pass; the built-in default is the
/// uniform reader, the controller overrides it from the configuration.
pub struct QueueIterator {
    next_tx: Sender<PlacementRequest>,
    resume: Arc<Notify>,
    configs: QueueConfigs,
    reader_factory: ReaderFactory,
}

impl QueueIterator {
    /// Creates a queue iterator for the provided queue configs, validating
    /// them first. Returns the iterator together with the receiving end of
    /// its output channel.
    pub fn new(
        configs: QueueConfigs,
    ) -> Result<(Self, Receiver<PlacementRequest>), QueueConfigError> {
        configs.validate()?;

        let (next_tx, next_rx) = mpsc::channel(1);
        let resume = Arc::new(Notify::new());

        // a push on any queue schedules a wakeup. the notify keeps at most
        // one pending permit so bursts of pushes coalesce and the pusher
        // never blocks.
        let handler = {
            let resume = Arc::clone(&resume);
            move || resume.notify_one()
        };
        configs.add_push_handler(handler);

        let iterator = Self {
            next_tx,
            resume,
            configs,
            reader_factory: Arc::new(|configs| Box::new(UniformReader::new(configs))),
        };
        Ok((iterator, next_rx))
    }

    /// Replaces the algorithm used to read requests from the queues.
    pub fn with_reader_factory(mut self, factory: ReaderFactory) -> Self {
        self.reader_factory = factory;
        self
    }

    /// Runs the iterator until the token is cancelled. Each pass builds a
    /// fresh reader and drains it into the output channel; once the reader
    /// runs dry the loop parks until a resume signal or cancellation. The
    /// output channel is closed on the way out.
    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            if shutdown.is_cancelled() {
                debug!("queue iterator stopping");
                return;
            }

            let mut reader = (self.reader_factory)(&self.configs);
            while let Some(request) = reader.read() {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    sent = self.next_tx.send(request) => {
                        if sent.is_err() {
                            // consumer is gone, nothing left to do.
                            return;
                        }
                    }
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = self.resume.notified() => {}
            }
        }
    }
}
