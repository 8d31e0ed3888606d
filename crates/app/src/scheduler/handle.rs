use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use marshal_domain::action::ScheduledAction;
use marshal_domain::error::{MarshalError, UnavailableError};

/// Snapshot of the scheduler state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    pub cursor: usize,
    pub len: usize,
    pub waiting: usize,
    /// Idle ticks left; `None` while actions are being dispatched.
    pub idle_remaining: Option<u32>,
    /// Armed timers; never more than one.
    pub pending_timers: usize,
    pub cycle: u64,
}

pub(crate) enum Command {
    Run,
    Skip,
    Repeat {
        delay: Option<Duration>,
    },
    InsertNext {
        item: ScheduledAction,
        delay: Option<Duration>,
    },
    Enqueue {
        item: ScheduledAction,
    },
    EnqueueDeferred {
        item: ScheduledAction,
    },
    Status {
        response: oneshot::Sender<SchedulerStatus>,
    },
    Shutdown,
}

/// Cloneable control handle of a running scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    sender: mpsc::Sender<Command>,
}

impl SchedulerHandle {
    pub(crate) fn new(sender: mpsc::Sender<Command>) -> Self {
        Self { sender }
    }

    /// Rebuild the queue and start dispatching.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::Unavailable`] once the scheduler has stopped.
    pub async fn run(&self) -> Result<(), MarshalError> {
        self.send(Command::Run).await
    }

    /// Dispatch the next action immediately.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::Unavailable`] once the scheduler has stopped.
    pub async fn skip(&self) -> Result<(), MarshalError> {
        self.send(Command::Skip).await
    }

    /// Dispatch the last action again after `delay`.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::Unavailable`] once the scheduler has stopped.
    pub async fn repeat(&self, delay: Option<Duration>) -> Result<(), MarshalError> {
        self.send(Command::Repeat { delay }).await
    }

    /// Make `item` the next action, dispatched after `delay`.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::Unavailable`] once the scheduler has stopped.
    pub async fn insert_next(
        &self,
        item: ScheduledAction,
        delay: Option<Duration>,
    ) -> Result<(), MarshalError> {
        self.send(Command::InsertNext { item, delay }).await
    }

    /// Append to the current cycle.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::Unavailable`] once the scheduler has stopped.
    pub async fn enqueue(&self, item: ScheduledAction) -> Result<(), MarshalError> {
        self.send(Command::Enqueue { item }).await
    }

    /// Append to the next cycle.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::Unavailable`] once the scheduler has stopped.
    pub async fn enqueue_deferred(&self, item: ScheduledAction) -> Result<(), MarshalError> {
        self.send(Command::EnqueueDeferred { item }).await
    }

    /// # Errors
    ///
    /// Returns [`MarshalError::Unavailable`] once the scheduler has stopped.
    pub async fn status(&self) -> Result<SchedulerStatus, MarshalError> {
        let (response, rx) = oneshot::channel();
        self.send(Command::Status { response }).await?;
        rx.await.map_err(|_| unavailable())
    }

    /// Stop the scheduler; pending timers are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::Unavailable`] when it already stopped.
    pub async fn shutdown(&self) -> Result<(), MarshalError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), MarshalError> {
        self.sender.send(command).await.map_err(|_| unavailable())
    }
}

fn unavailable() -> MarshalError {
    UnavailableError {
        service: "scheduler",
    }
    .into()
}
