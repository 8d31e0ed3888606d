//! The seam between the scheduler and whatever executes actions.

use std::future::Future;
use std::time::Duration;

use marshal_domain::action::{Action, ScheduledAction};
use marshal_domain::error::MarshalError;

/// Executes dispatched actions.
///
/// Exactly one action is handled at a time. An `Err` is logged and the
/// chain proceeds as if the handler had returned [`HandlerOutcome::proceed`].
pub trait ActionHandler: Send + Sync {
    fn handle(
        &self,
        action: &Action,
    ) -> impl Future<Output = Result<HandlerOutcome, MarshalError>> + Send;
}

/// How the chain continues after an action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Continuation {
    /// Dispatch the next action after this one's delay.
    #[default]
    Proceed,
    /// Dispatch this same action again after the given delay (base delay if `None`).
    Repeat(Option<Duration>),
    /// Dispatch the given action next, after the base delay.
    InsertNext(ScheduledAction),
    /// Dispatch the next action right away.
    Skip,
}

/// What a handler asks the scheduler to do after it returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandlerOutcome {
    /// Appended to the current cycle, in order.
    pub follow_ups: Vec<ScheduledAction>,
    pub continuation: Continuation,
    /// Once the queue runs out, start the next cycle this long after the
    /// action returned instead of counting down the idle ticks.
    pub next_cycle: Option<Duration>,
}

impl HandlerOutcome {
    #[must_use]
    pub fn proceed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn repeat(delay: Option<Duration>) -> Self {
        Self {
            continuation: Continuation::Repeat(delay),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn then(mut self, follow_ups: impl IntoIterator<Item = ScheduledAction>) -> Self {
        self.follow_ups.extend(follow_ups);
        self
    }

    #[must_use]
    pub fn next_cycle_in(mut self, delay: Duration) -> Self {
        self.next_cycle = Some(delay);
        self
    }
}
