//! Specialists as observed in the game: position, carried army, current task.

use serde::{Deserialize, Serialize};

use crate::id::{BuildingId, ParticipantId};
use crate::roster::Roster;
use crate::zone::Grid;

/// What a specialist is doing right now.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecialistTask {
    #[default]
    Idle,
    /// Walking to `to`; arrives in `remaining_ms`.
    Moving { to: Grid, remaining_ms: u64 },
    /// Fighting `target`; resolves in `remaining_ms`.
    Attacking { target: BuildingId, remaining_ms: u64 },
    /// Any other timed activity (healing, travelling between zones, …).
    Busy { remaining_ms: u64 },
}

impl SpecialistTask {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Time left on the current task, zero when idle.
    #[must_use]
    pub fn remaining_ms(&self) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Moving { remaining_ms, .. }
            | Self::Attacking { remaining_ms, .. }
            | Self::Busy { remaining_ms } => *remaining_ms,
        }
    }

    /// Destination when the task is a move.
    #[must_use]
    pub fn heading_to(&self) -> Option<Grid> {
        match self {
            Self::Moving { to, .. } => Some(*to),
            _ => None,
        }
    }
}

/// One specialist as the game currently reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistObservation {
    pub id: ParticipantId,
    pub name: String,
    /// Cell the specialist stands on; `None` while it is not placed in the zone.
    pub grid: Option<Grid>,
    /// Units the specialist carries.
    pub roster: Roster,
    pub task: SpecialistTask,
}

impl SpecialistObservation {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.task.is_idle()
    }
}
