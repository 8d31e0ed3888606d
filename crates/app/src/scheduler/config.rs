use std::time::Duration;

/// Tunables of the action scheduler and the plan evaluation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Pause after an action that carries no delay of its own.
    pub base_delay: Duration,
    /// Idle ticks counted down before an automatic `run()`.
    pub idle_ticks: u32,
    pub idle_tick: Duration,
    /// How often the watchdog looks at the chain.
    pub watchdog_interval: Duration,
    /// Grace added to the expected delay before the chain counts as stalled.
    pub watchdog_slack: Duration,
    /// Default wait between two evaluations of the same step.
    pub evaluation_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1500),
            idle_ticks: 10,
            idle_tick: Duration::from_secs(1),
            watchdog_interval: Duration::from_secs(5),
            watchdog_slack: Duration::from_secs(30),
            evaluation_interval: Duration::from_secs(3),
        }
    }
}
