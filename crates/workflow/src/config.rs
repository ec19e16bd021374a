use std::time::Duration;

use crate::status::DEFAULT_STATUS_DISPLAY;

/// Tunables for a [`WorkflowController`](crate::WorkflowController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// How long a notify status stays visible.
    pub status_display: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            status_display: DEFAULT_STATUS_DISPLAY,
        }
    }
}

impl WorkflowConfig {
    #[must_use]
    pub fn with_status_display(mut self, window: Duration) -> Self {
        self.status_display = window;
        self
    }
}
