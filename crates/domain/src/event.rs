//! Event: an immutable record of something the scheduler did.
//!
//! Events are published on the in-process bus and streamed to operators.

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::time::{Timestamp, now};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerEvent {
    /// `run()` rebuilt the queue.
    CycleStarted { cycle: u64, queued: usize },
    /// An action was handed to its handler.
    Dispatched { cycle: u64, index: usize, action: String },
    /// A handler returned an error; the chain went on.
    HandlerFailed { action: String, error: String },
    /// The queue ran dry and the idle countdown began.
    IdleStarted { ticks: u32 },
    /// One idle tick elapsed.
    IdleTick { remaining: u32 },
    /// The chain looked stalled and was restarted.
    WatchdogFired { elapsed_ms: u64, expected_ms: u64 },
    /// The scheduler actor stopped.
    Stopped,
}

impl SchedulerEvent {
    /// Short name used as the SSE event type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CycleStarted { .. } => "cycle_started",
            Self::Dispatched { .. } => "dispatched",
            Self::HandlerFailed { .. } => "handler_failed",
            Self::IdleStarted { .. } => "idle_started",
            Self::IdleTick { .. } => "idle_tick",
            Self::WatchdogFired { .. } => "watchdog_fired",
            Self::Stopped => "stopped",
        }
    }
}

/// A timestamped [`SchedulerEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: SchedulerEvent,
}

impl Event {
    #[must_use]
    pub fn new(kind: SchedulerEvent) -> Self {
        Self {
            id: EventId::new(),
            timestamp: now(),
            kind,
        }
    }
}
