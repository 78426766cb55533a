//! Tunable knobs of the placement request controller.

use std::time::Duration;

/// Controller options with sensible defaults.
#[derive(Clone, Debug)]
pub struct Options {
    /// Deadline applied to the best-effort status writes that reject a
    /// placement request before it reaches a queue. Rejections run under
    /// their own deadline so a slow control plane cannot stall admission.
    pub try_to_reject_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            try_to_reject_timeout: Duration::from_secs(2),
        }
    }
}

impl Options {
    pub fn with_try_to_reject_timeout(mut self, timeout: Duration) -> Self {
        self.try_to_reject_timeout = timeout;
        self
    }
}
