use std::fmt;

use serde::{Deserialize, Serialize};

/// Sub-state of a battle-wave step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    /// Bring every participant onto its grid.
    Move,
    /// Make every carried army match the required roster.
    Load,
    /// Issue attacks and boosts.
    Attack,
    /// Wait for the targeted buildings to fall.
    Attacking,
}

impl BattlePhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Load => "load",
            Self::Attack => "attack",
            Self::Attacking => "attacking",
        }
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
