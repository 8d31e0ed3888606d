//! Scheduled actions: the items the action scheduler dispatches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::GameCommand;

/// What a dispatched queue item does.
///
/// The set is closed: every variant has exactly one handler, chosen by an
/// exhaustive match in the application layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// First item of every cycle; publishes the cycle number.
    StatusMarker { cycle: u64 },
    /// Evaluate the current step of the selected plan.
    EvaluatePlan,
    /// Send a command to the game.
    Submit { command: GameCommand },
    /// Rescan owned units into the unit ledger.
    RefreshLedger,
    /// Do nothing; only its delay matters.
    Wait,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StatusMarker { cycle } => write!(f, "status_marker({cycle})"),
            Self::EvaluatePlan => f.write_str("evaluate_plan"),
            Self::Submit { command } => write!(f, "submit({command})"),
            Self::RefreshLedger => f.write_str("refresh_ledger"),
            Self::Wait => f.write_str("wait"),
        }
    }
}

/// A queue item: an action plus an optional delay override.
///
/// The delay is the pause *after* this action is dispatched, before the
/// next one; `None` means the scheduler's base delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAction {
    action: Action,
    delay: Option<Duration>,
}

impl ScheduledAction {
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            delay: None,
        }
    }

    #[must_use]
    pub fn with_delay(action: Action, delay: Duration) -> Self {
        Self {
            action,
            delay: Some(delay),
        }
    }

    #[must_use]
    pub fn submit(command: GameCommand) -> Self {
        Self::new(Action::Submit { command })
    }

    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// The delay to wait after this action, falling back to `base`.
    #[must_use]
    pub fn delay_or(&self, base: Duration) -> Duration {
        self.delay.unwrap_or(base)
    }
}

impl From<Action> for ScheduledAction {
    fn from(action: Action) -> Self {
        Self::new(action)
    }
}
