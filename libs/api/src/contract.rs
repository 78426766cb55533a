//! Contract constants shared with the binder-side scheduler plugin.
//!
//! The binder plugin creates a PlacementRequest for each pod it wants bound
//! and polls the status until the result is terminal. If a request with the
//! same name already exists it deletes and re-creates it; in-place updates
//! are not supported.

use std::time::Duration;

/// How long the binder plugin waits for a placement request to reach a
/// terminal status before giving up on the scheduling cycle.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// How long the binder plugin waits when deleting a stale placement request
/// it no longer cares about.
pub const DELETE_PLACEMENT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Name of the binder-side scheduler as deployed in the cluster. The
/// scheduler only operates on pods that name it in their spec.
pub const BINDER_SCHEDULER_NAME: &str = "placement-request-scheduler";

/// Name of the binder plugin as referenced in the scheduler configuration.
pub const BINDER_PLUGIN_NAME: &str = "PlacementRequestBinder";
