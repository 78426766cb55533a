//! Weighted random queue reader.

use kombiner_api::PlacementRequest;
use rand::Rng;

use super::config::{QueueConfig, QueueConfigs};
use super::reader::Reader;

/// Reads from multiple queues by weighted random selection. The weights
/// determine the probability of drawing from each queue, so over many reads
/// every scheduler receives its configured share of the dispatch bandwidth.
pub struct UniformReader {
    configs: Vec<QueueConfig>,
}

impl UniformReader {
    pub fn new(configs: &QueueConfigs) -> Self {
        Self {
            configs: configs.to_vec(),
        }
    }
}

impl Reader for UniformReader {
    /// Selects the next request out of the queues, or `None` when every
    /// queue is empty. A drawn queue that turns out to be empty is removed
    /// from the candidate set and the selection is retried on the rest.
    fn read(&mut self) -> Option<PlacementRequest> {
        let mut candidates = self.configs.clone();
        while !candidates.is_empty() {
            let index = next(&candidates);
            if let Some(request) = candidates[index].queue_ref.pop() {
                return Some(request);
            }
            candidates.remove(index);
        }
        None
    }
}

/// Picks the index of the next queue to read from. A random point is chosen
/// in `[1, total weight]` and walked through the cumulative weights; the
/// queue whose range contains the point wins.
fn next(candidates: &[QueueConfig]) -> usize {
    let total: u64 = candidates
        .iter()
        .map(|config| u64::from(config.queue.weight))
        .sum();

    let selected = rand::thread_rng().gen_range(1..=total);

    let mut sum = 0u64;
    for (index, config) in candidates.iter().enumerate() {
        sum += u64::from(config.queue.weight);
        if selected <= sum {
            return index;
        }
    }

    // the selected point always lands inside the cumulative weight range.
    unreachable!("no queue selected");
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use kombiner_api::Queue;

    use super::super::placement_request::PlacementRequestQueue;
    use super::*;

    fn config(name: &str, weight: u32) -> QueueConfig {
        QueueConfig {
            queue: Queue {
                scheduler_name: name.to_string(),
                weight,
                max_size: 100,
                plugins: Default::default(),
            },
            queue_ref: Arc::new(PlacementRequestQueue::new()),
        }
    }

    #[test]
    fn selection_follows_the_weights() {
        let configs = vec![
            config("scheduler-1", 7),
            config("scheduler-2", 2),
            config("scheduler-3", 1),
        ];

        let iterations = 1_000_000;
        let mut counters: HashMap<&str, usize> = HashMap::new();
        for _ in 0..iterations {
            let index = next(&configs);
            *counters
                .entry(match index {
                    0 => "scheduler-1",
                    1 => "scheduler-2",
                    _ => "scheduler-3",
                })
                .or_default() += 1;
        }

        let percentage =
            |name: &str| counters.get(name).copied().unwrap_or(0) * 100 / iterations;

        // ballpark: 70%, 20% and 10% with a 2% margin of error.
        assert!((68..=72).contains(&percentage("scheduler-1")));
        assert!((18..=22).contains(&percentage("scheduler-2")));
        assert!((8..=12).contains(&percentage("scheduler-3")));
    }

    #[test]
    fn read_skips_empty_queues() {
        let first = config("scheduler-1", 1000);
        let second = config("scheduler-2", 1);
        second
            .queue_ref
            .push(kombiner_api::PlacementRequest::new("pr", Default::default()));

        let configs = QueueConfigs::from(vec![first, second]);
        let mut reader = UniformReader::new(&configs);

        // the heavy queue is empty, the light one must still be found.
        assert!(reader.read().is_some());
        assert!(reader.read().is_none());
    }

    #[test]
    fn read_returns_none_when_all_queues_are_empty() {
        let configs = QueueConfigs::from(vec![config("scheduler-1", 1)]);
        let mut reader = UniformReader::new(&configs);
        assert!(reader.read().is_none());
    }
}
