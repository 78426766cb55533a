//! Weight-proportional round-robin queue reader.

use kombiner_api::PlacementRequest;

use super::config::QueueConfigs;
use super::reader::Reader;

/// The minimum number of binds guaranteed to the queue with the lowest
/// weight on each pass. Every bind inside a PlacementRequest counts towards
/// this amount.
pub const MINIMUM_BINDINGS: usize = 10;

/// A QueueConfig extended with the number of binds allowed for the queue on
/// this pass and a counter of how many binds were already read.
struct ExtendedQueueConfig {
    config: super::config::QueueConfig,
    maximum_bindings: usize,
    bindings_read: usize,
}

/// Keeps reading from the same queue until it is empty or its binding quota
/// is reached, then moves to the next one. Quotas are proportional to the
/// queue weights: the lightest queue receives `MINIMUM_BINDINGS` and the
/// rest scale up from there.
pub struct RoundRobinReader {
    configs: Vec<ExtendedQueueConfig>,
}

impl RoundRobinReader {
    /// Builds a reader from the provided queue configurations. Expects the
    /// configuration to be sanitized already; a zero weight is a corrupted
    /// input and aborts.
    pub fn new(configs: &QueueConfigs) -> Self {
        let lightest = configs
            .iter()
            .map(|config| config.queue.weight)
            .min()
            .expect("round-robin reader needs at least one queue");

        // dividing by a zero weight would hand out unbounded quotas.
        if lightest == 0 {
            panic!("queue with zero weight provided");
        }

        let configs = configs
            .iter()
            .map(|config| {
                let multiplier = f64::from(config.queue.weight) / f64::from(lightest);
                let maximum_bindings = (multiplier * MINIMUM_BINDINGS as f64).ceil() as usize;
                ExtendedQueueConfig {
                    config: config.clone(),
                    maximum_bindings,
                    bindings_read: 0,
                }
            })
            .collect();

        Self { configs }
    }

    /// True when every queue is empty.
    fn empty(&self) -> bool {
        self.configs
            .iter()
            .all(|config| config.config.queue_ref.is_empty())
    }

    /// Resets the read counters so a new pass can start from the beginning.
    fn reset(&mut self) {
        for config in &mut self.configs {
            config.bindings_read = 0;
        }
    }

    /// Index of the first queue that has not yet exhausted its quota, or
    /// `None` when all of them have.
    fn next(&self) -> Option<usize> {
        self.configs
            .iter()
            .position(|config| config.bindings_read < config.maximum_bindings)
    }
}

impl Reader for RoundRobinReader {
    fn read(&mut self) -> Option<PlacementRequest> {
        loop {
            // nothing left anywhere, also the stop condition for retries.
            if self.empty() {
                return None;
            }

            let index = match self.next() {
                Some(index) => index,
                None => {
                    // every quota is exhausted but requests remain, so we
                    // reset the counters and start a new pass.
                    self.reset();
                    match self.next() {
                        Some(index) => index,
                        None => panic!("no queues to read from but not all are empty"),
                    }
                }
            };

            if let Some(request) = self.configs[index].config.queue_ref.pop() {
                self.configs[index].bindings_read += request.spec.bindings.len();
                return Some(request);
            }

            // the queue gave us nothing, mark it exhausted for this pass and
            // try the next one.
            self.configs[index].bindings_read = self.configs[index].maximum_bindings;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kombiner_api::{Binding, PlacementRequest, PlacementRequestSpec, Queue};

    use super::super::config::QueueConfig;
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

    // pods are numbered; the number doubles as the creation time so the
    // within-queue ordering is deterministic.
    fn request(pod: &str) -> PlacementRequest {
        use chrono::{TimeZone, Utc};
        use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

        let seq: i64 = pod.trim_start_matches("pod").parse().unwrap();
        let mut pr = PlacementRequest::new(
            pod,
            PlacementRequestSpec {
                bindings: vec![Binding {
                    pod_name: pod.to_string(),
                    pod_uid: pod.to_string(),
                    node_name: "node-1".to_string(),
                }],
                ..Default::default()
            },
        );
        pr.metadata.creation_timestamp = Some(Time(Utc.timestamp_opt(seq, 0).unwrap()));
        pr
    }

    fn extended(name: &str, maximum_bindings: usize, bindings_read: usize) -> ExtendedQueueConfig {
        ExtendedQueueConfig {
            config: config(name, 1),
            maximum_bindings,
            bindings_read,
        }
    }

    fn drain(reader: &mut RoundRobinReader) -> Vec<String> {
        let mut pods = Vec::new();
        while let Some(pr) = reader.read() {
            pods.push(pr.spec.bindings[0].pod_name.clone());
        }
        pods
    }

    #[test]
    fn quotas_scale_with_the_weights() {
        let configs = QueueConfigs::from(vec![
            config("a", 2),
            config("b", 3),
            config("c", 4),
            config("d", 2),
            config("e", 13),
        ]);

        let reader = RoundRobinReader::new(&configs);
        let quotas: Vec<usize> = reader
            .configs
            .iter()
            .map(|config| config.maximum_bindings)
            .collect();
        assert_eq!(quotas, vec![MINIMUM_BINDINGS, 15, 20, MINIMUM_BINDINGS, 65]);
    }

    #[test]
    #[should_panic(expected = "zero weight")]
    fn zero_weight_aborts() {
        let configs = QueueConfigs::from(vec![config("a", 0)]);
        let _ = RoundRobinReader::new(&configs);
    }

    #[test]
    fn next_returns_first_unexhausted_queue() {
        let reader = RoundRobinReader {
            configs: vec![extended("a", 2, 0), extended("b", 3, 1)],
        };
        assert_eq!(reader.next(), Some(0));

        let reader = RoundRobinReader {
            configs: vec![extended("a", 2, 2), extended("b", 3, 1)],
        };
        assert_eq!(reader.next(), Some(1));

        // overflown counters also count as exhausted.
        let reader = RoundRobinReader {
            configs: vec![extended("a", 2, 8), extended("b", 3, 1)],
        };
        assert_eq!(reader.next(), Some(1));

        let reader = RoundRobinReader {
            configs: vec![extended("a", 1, 1), extended("b", 2, 2)],
        };
        assert_eq!(reader.next(), None);

        let reader = RoundRobinReader {
            configs: vec![],
        };
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn skips_an_empty_first_queue() {
        let first = extended("a", 2, 0);
        let second = extended("b", 2, 0);
        second.config.queue_ref.push(request("pod3"));
        second.config.queue_ref.push(request("pod4"));

        let mut reader = RoundRobinReader {
            configs: vec![first, second],
        };
        assert_eq!(drain(&mut reader), vec!["pod3", "pod4"]);
    }

    #[test]
    fn returns_none_when_all_queues_are_empty() {
        let mut reader = RoundRobinReader {
            configs: vec![extended("a", 2, 0), extended("b", 2, 0)],
        };
        assert!(reader.read().is_none());
    }

    #[test]
    fn drains_queues_in_declared_order_within_quota() {
        let first = extended("a", 2, 0);
        let second = extended("b", 2, 0);
        first.config.queue_ref.push(request("pod1"));
        first.config.queue_ref.push(request("pod2"));
        second.config.queue_ref.push(request("pod3"));
        second.config.queue_ref.push(request("pod4"));

        let mut reader = RoundRobinReader {
            configs: vec![first, second],
        };
        assert_eq!(drain(&mut reader), vec!["pod1", "pod2", "pod3", "pod4"]);
    }

    #[test]
    fn quota_exhaustion_rotates_across_queues_and_resets() {
        let first = extended("a", 1, 0);
        let second = extended("b", 1, 0);
        let third = extended("c", 1, 0);
        first.config.queue_ref.push(request("pod1"));
        first.config.queue_ref.push(request("pod2"));
        second.config.queue_ref.push(request("pod3"));
        second.config.queue_ref.push(request("pod4"));
        third.config.queue_ref.push(request("pod5"));
        third.config.queue_ref.push(request("pod6"));

        let mut reader = RoundRobinReader {
            configs: vec![first, second, third],
        };
        assert_eq!(
            drain(&mut reader),
            vec!["pod1", "pod3", "pod5", "pod2", "pod4", "pod6"]
        );
    }

    #[test]
    fn starts_from_the_first_queue_with_remaining_quota() {
        // the first queue enters the pass already exhausted, so reading
        // starts on the second queue and only returns to the first after
        // the counters reset.
        let first = extended("a", 2, 2);
        let second = extended("b", 2, 0);
        first.config.queue_ref.push(request("pod1"));
        first.config.queue_ref.push(request("pod2"));
        second.config.queue_ref.push(request("pod3"));
        second.config.queue_ref.push(request("pod4"));

        let mut reader = RoundRobinReader {
            configs: vec![first, second],
        };
        assert_eq!(drain(&mut reader), vec!["pod3", "pod4", "pod1", "pod2"]);
    }
}
