//! Shared builders for the controller integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use k8s_openapi::api::core::v1::{Node, NodeSpec, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::api::ObjectMeta;

use kombiner_api::{
    Binding, Configuration, PlacementRequest, PlacementRequestPolicy, PlacementRequestSpec, Queue,
};
use kombiner_controller::queue::{PlacementRequestQueue, QueueConfig, QueueConfigs};

/// A queue config backed by a fresh queue.
pub fn queue_config(name: &str, weight: u32, max_size: usize) -> QueueConfig {
    QueueConfig {
        queue: Queue {
            scheduler_name: name.to_string(),
            weight,
            max_size,
            plugins: Default::default(),
        },
        queue_ref: Arc::new(PlacementRequestQueue::new()),
    }
}

/// Queue configs from (scheduler name, weight) pairs.
pub fn queue_configs(specs: &[(&str, u32)]) -> QueueConfigs {
    QueueConfigs::from(
        specs
            .iter()
            .map(|(name, weight)| queue_config(name, *weight, 100))
            .collect::<Vec<_>>(),
    )
}

/// A configuration declaring a single queue.
pub fn single_queue_configuration(scheduler: &str, max_size: usize) -> Configuration {
    Configuration {
        queues: vec![Queue {
            scheduler_name: scheduler.to_string(),
            weight: 1,
            max_size,
            plugins: Default::default(),
        }],
        ..Default::default()
    }
}

/// A lenient placement request in the default namespace. The sequence
/// number doubles as the creation time so ordering is deterministic.
pub fn placement_request(
    name: &str,
    scheduler: &str,
    bindings: &[(&str, &str)],
    seq: i64,
) -> PlacementRequest {
    let mut pr = PlacementRequest::new(
        name,
        PlacementRequestSpec {
            policy: PlacementRequestPolicy::Lenient,
            priority: 0,
            scheduler_name: scheduler.to_string(),
            bindings: bindings
                .iter()
                .map(|(pod, node)| Binding {
                    pod_name: pod.to_string(),
                    pod_uid: format!("{pod}-uid"),
                    node_name: node.to_string(),
                })
                .collect(),
        },
    );
    pr.metadata.namespace = Some("default".to_string());
    pr.metadata.creation_timestamp = Some(Time(Utc.timestamp_opt(seq, 0).unwrap()));
    pr
}

/// An unassigned pod in the default namespace.
pub fn pod(name: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            uid: Some(format!("{name}-uid")),
            ..Default::default()
        },
        spec: Some(PodSpec::default()),
        ..Default::default()
    }
}

/// A pod already assigned to a node.
pub fn pod_on_node(name: &str, node: &str) -> Pod {
    let mut pod = pod(name);
    pod.spec.as_mut().unwrap().node_name = Some(node.to_string());
    pod
}

/// A cluster node, optionally cordoned.
pub fn node(name: &str, unschedulable: bool) -> Node {
    Node {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Some(NodeSpec {
            unschedulable: Some(unschedulable),
            ..Default::default()
        }),
        ..Default::default()
    }
}
