use std::time::Duration;

/// Timing policy for a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationPolicy {
    /// Delay between inventory samples while waiting for stops to settle.
    pub poll_interval: Duration,
    /// Wall-clock budget for the stop-and-confirm phase.
    pub poll_budget: Duration,
    /// Pause between migrating a stack and starting it again.
    pub settle_delay: Duration,
}

impl MigrationPolicy {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_POLL_BUDGET: Duration = Duration::from_secs(10);
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

    pub fn with_poll_budget(mut self, budget: Duration) -> Self {
        self.poll_budget = budget;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

impl Default for MigrationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            poll_budget: Self::DEFAULT_POLL_BUDGET,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
        }
    }
}
