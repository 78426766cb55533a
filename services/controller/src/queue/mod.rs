//! Per-scheduler priority queues and the fairness-arbitrated iterator.
//!
//! Placement requests are admitted into one prioritized queue per scheduler
//! (ordered by creation time) and drawn back out by the [`QueueIterator`],
//! which arbitrates between the queues through a pluggable [`Reader`]:
//! weighted random selection ([`UniformReader`]) or weight-proportional
//! quotas ([`RoundRobinReader`]).

mod config;
mod iterator;
mod placement_request;
mod priority;
mod reader;
mod round_robin;
mod uniform;

pub use config::{QueueConfig, QueueConfigError, QueueConfigs};
pub use iterator::QueueIterator;
pub use placement_request::PlacementRequestQueue;
pub use priority::{Prioritized, PriorityQueue};
pub use reader::{Reader, ReaderFactory};
pub use round_robin::{RoundRobinReader, MINIMUM_BINDINGS};
pub use uniform::UniformReader;
