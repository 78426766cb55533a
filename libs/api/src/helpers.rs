//! Status helpers for placement requests.
//!
//! The controller mutates request status exclusively through these helpers
//! so the per-binding entries stay keyed by pod UID and the overall result
//! assessment stays in one place.

use crate::error::ValidationError;
use crate::types::{
    Binding, PlacementRequest, PlacementRequestBindingResult, PlacementRequestPolicy,
    PlacementRequestResult, PlacementRequestStatus,
};

/// Returns the overall result recorded on the request, `Unknown` when the
/// status subresource has not been written yet.
pub fn result(pr: &PlacementRequest) -> PlacementRequestResult {
    pr.status.as_ref().map(|s| s.result).unwrap_or_default()
}

/// Basic dispatchability checks. The returned error message is suitable for
/// writing into the request status verbatim.
pub fn validate(pr: &PlacementRequest) -> Result<(), ValidationError> {
    if pr.spec.bindings.is_empty() {
        return Err(ValidationError::NoBindings);
    }

    // Only the lenient policy is executed today; objects carrying the
    // AllOrNothing policy are still accepted by the API server but are
    // rejected here.
    if pr.spec.policy != PlacementRequestPolicy::Lenient {
        return Err(ValidationError::UnsupportedPolicy(format!(
            "{:?}",
            pr.spec.policy
        )));
    }

    Ok(())
}

/// Records a failed binding outcome on the request status.
pub fn set_binding_failure(pr: &mut PlacementRequest, bind: &Binding, reason: &str, msg: &str) {
    set_binding_result(pr, bind, PlacementRequestResult::Failure, reason, msg);
}

/// Records a successful binding outcome on the request status.
pub fn set_binding_success(pr: &mut PlacementRequest, bind: &Binding, reason: &str, msg: &str) {
    set_binding_result(pr, bind, PlacementRequestResult::Success, reason, msg);
}

/// Records a single binding outcome, keyed by pod UID. A second write for
/// the same pod UID replaces the earlier entry so the status never carries
/// duplicates for one spec binding.
pub fn set_binding_result(
    pr: &mut PlacementRequest,
    bind: &Binding,
    result: PlacementRequestResult,
    reason: &str,
    msg: &str,
) {
    let entry = PlacementRequestBindingResult {
        binding: bind.clone(),
        result,
        reason: reason.to_string(),
        message: msg.to_string(),
    };

    let status = pr.status.get_or_insert_with(PlacementRequestStatus::default);
    if let Some(existing) = status
        .bindings
        .iter_mut()
        .find(|b| b.binding.pod_uid == bind.pod_uid)
    {
        *existing = entry;
        return;
    }
    status.bindings.push(entry);
}

/// Assesses the overall result of a request from its per-binding entries.
/// Returns the result together with a human readable message.
pub fn assess_result(pr: &PlacementRequest) -> (PlacementRequestResult, String) {
    let bindings = pr
        .status
        .as_ref()
        .map(|s| s.bindings.as_slice())
        .unwrap_or_default();

    if bindings.is_empty() {
        return (PlacementRequestResult::Rejected, "No bindings".to_string());
    }

    let successes = bindings
        .iter()
        .filter(|b| b.result == PlacementRequestResult::Success)
        .count();

    match successes {
        0 => (
            PlacementRequestResult::Failure,
            "All bindings failed".to_string(),
        ),
        n if n == bindings.len() => (
            PlacementRequestResult::Success,
            "All bindings succeeded".to_string(),
        ),
        n => (
            PlacementRequestResult::PartialSuccess,
            format!("{} of {} bindings succeeded", n, bindings.len()),
        ),
    }
}
