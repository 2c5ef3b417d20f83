//! Tuning knobs for the queue controller.

use std::time::Duration;

/// Page size requested from candidate sources
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Upper bound on one decision submission
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Upper bound on one transition effect. The longest effect in use runs
/// 2000 ms; anything past this is treated as a hung animator.
pub const DEFAULT_TRANSITION_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    pub page_size: u32,
    pub submit_timeout: Duration,
    pub transition_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            transition_timeout: DEFAULT_TRANSITION_TIMEOUT,
        }
    }
}

impl QueueConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn with_transition_timeout(mut self, timeout: Duration) -> Self {
        self.transition_timeout = timeout;
        self
    }
}
