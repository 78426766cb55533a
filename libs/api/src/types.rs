//! The PlacementRequest custom resource.
//!
//! The CRD schema is maintained externally in the deployment manifests; the
//! types here mirror it field for field. The status is a subresource and is
//! updated independently from the spec.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Governs how the bindings inside a placement request relate to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum PlacementRequestPolicy {
    /// Bindings are independent; partial success is acceptable.
    #[default]
    Lenient,
    /// Either every binding succeeds or none must happen. Recognized on
    /// input but not executed; requests carrying it are rejected until the
    /// semantics are settled.
    AllOrNothing,
}

/// Outcome of processing a placement request or a single binding.
///
/// The empty string on the wire means the result is not yet known; any other
/// value is terminal and the request is never re-processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum PlacementRequestResult {
    #[default]
    #[serde(rename = "")]
    Unknown,
    Success,
    Failure,
    PartialSuccess,
    Rejected,
}

impl PlacementRequestResult {
    /// A terminal result will never be re-dispatched.
    pub fn is_terminal(&self) -> bool {
        *self != PlacementRequestResult::Unknown
    }
}

/// A single pod-to-node binding request, scoped to the PlacementRequest
/// namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Name of the pod that should be bound to the node.
    pub pod_name: String,

    /// UID of the pod, pinning the binding to a concrete pod incarnation.
    #[serde(rename = "podUID")]
    pub pod_uid: String,

    /// Name of the node the pod should land on.
    pub node_name: String,
}

/// Desired state of a placement request: a policy and a group of bindings
/// produced by a single scheduler.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize)]
#[kube(
    group = "kombiner.sigs.k8s.io",
    version = "v1alpha1",
    kind = "PlacementRequest",
    namespaced,
    status = "PlacementRequestStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequestSpec {
    /// Relationship between the bindings in this request.
    pub policy: PlacementRequestPolicy,

    /// Arbitrary integer; requests with a higher priority are meant to be
    /// served first. Queue ordering currently uses the creation timestamp,
    /// so this field is advisory.
    #[serde(default)]
    pub priority: i32,

    /// Name of the scheduler that created this request. Selects the queue
    /// the request is admitted into.
    #[serde(default)]
    pub scheduler_name: String,

    /// The bindings the controller should attempt, in order.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// Observed outcome of a placement request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequestStatus {
    /// Overall result of the request.
    #[serde(default)]
    pub result: PlacementRequestResult,

    /// Short machine-readable reason for the result.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Human-readable message explaining the result.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Per-binding outcomes, keyed by the pod UID of the spec binding they
    /// mirror. Order need not match the spec.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<PlacementRequestBindingResult>,
}

/// Outcome of a single binding inside a placement request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequestBindingResult {
    pub binding: Binding,
    pub result: PlacementRequestResult,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}
