//! Validation errors for placement requests.

use thiserror::Error;

/// Reasons a placement request cannot be dispatched. The message is written
/// verbatim into the request status when the request is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The request carries no bindings at all.
    #[error("the placement request has no bindings")]
    NoBindings,

    /// The request carries a policy the controller does not execute.
    #[error("unsupported policy: {0}")]
    UnsupportedPolicy(String),
}
