//! Battle wave payload: what the template author asks for.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{BuildingId, ParticipantId};
use crate::roster::Roster;
use crate::zone::Grid;

/// Whether a participant is a unit-carrying specialist or a boost item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantKind {
    #[default]
    Unit,
    Boost,
}

/// One participant of a battle wave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveParticipant {
    pub id: ParticipantId,
    #[serde(default)]
    pub kind: ParticipantKind,
    /// Army the specialist must carry before attacking.
    #[serde(default)]
    pub roster: Roster,
    /// Cell the participant must stand on (units) or aim at (boosts).
    pub grid: Grid,
    /// Hostile building to attack.
    #[serde(default)]
    pub target: Option<BuildingId>,
    /// Boost item to use; only meaningful for [`ParticipantKind::Boost`].
    #[serde(default)]
    pub item: Option<String>,
}

/// Payload of a battle-wave step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleWave {
    pub participants: Vec<WaveParticipant>,
}

impl BattleWave {
    /// Hostile buildings this wave attacks.
    pub fn targets(&self) -> impl Iterator<Item = BuildingId> + '_ {
        self.participants.iter().filter_map(|p| p.target)
    }

    pub(crate) fn validate(&self, step: usize) -> Result<(), ValidationError> {
        if self.participants.is_empty() {
            return Err(ValidationError::EmptyWave { step });
        }
        let mut seen = HashSet::new();
        for p in &self.participants {
            if !seen.insert(p.id) {
                return Err(ValidationError::DuplicateParticipant {
                    step,
                    participant: p.id.to_string(),
                });
            }
            if p.kind == ParticipantKind::Unit && p.roster.is_empty() {
                return Err(ValidationError::EmptyRoster {
                    step,
                    participant: p.id.to_string(),
                });
            }
        }
        Ok(())
    }
}
