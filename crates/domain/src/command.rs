//! Game commands: everything the automation core may ask the game to do.
//!
//! A [`GameCommand`] is the typed form; [`Submission`] is the flat shape the
//! command submission port accepts (`action code`, `target grid`, `amount`,
//! `payload`).

use serde::{Deserialize, Serialize};

use crate::id::{BuildingId, ParticipantId};
use crate::roster::{Roster, UnitType};
use crate::zone::{Grid, Zone};

/// A single command to send to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameCommand {
    /// Travel to another zone.
    Travel { zone: Zone },
    /// Move (or place) a specialist onto a grid cell.
    Move {
        participant: ParticipantId,
        #[serde(default)]
        from: Option<Grid>,
        to: Grid,
    },
    /// Set a specialist's carried army to exactly `roster`.
    Load {
        participant: ParticipantId,
        roster: Roster,
    },
    /// Return every carried unit of the listed specialists to the free pool.
    UnassignAll { participants: Vec<ParticipantId> },
    /// Send a specialist against a hostile building.
    Attack {
        participant: ParticipantId,
        target: BuildingId,
        grid: Grid,
    },
    /// Use a boost item, optionally on a target building.
    ApplyBoost {
        #[serde(default)]
        participant: Option<ParticipantId>,
        item: String,
        #[serde(default)]
        target: Option<BuildingId>,
        #[serde(default)]
        grid: Option<Grid>,
    },
    /// Queue production of a stock item.
    Produce { item: String, amount: u32 },
    /// Queue recruitment of army units at home.
    Recruit { unit: UnitType, amount: u32 },
    /// Pick up every collectible lying in the current zone.
    CollectAll,
    /// Leave the adventure and return to the home island.
    ReturnHome,
}

/// Wire-level action codes understood by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCode {
    Travel,
    Move,
    Load,
    UnassignAll,
    Attack,
    ApplyBoost,
    Produce,
    Recruit,
    CollectAll,
    ReturnHome,
}

impl ActionCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Move => "move",
            Self::Load => "load",
            Self::UnassignAll => "unassign_all",
            Self::Attack => "attack",
            Self::ApplyBoost => "apply_boost",
            Self::Produce => "produce",
            Self::Recruit => "recruit",
            Self::CollectAll => "collect_all",
            Self::ReturnHome => "return_home",
        }
    }
}

impl std::fmt::Display for ActionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat command shape handed to the command submission port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub action_code: ActionCode,
    pub target_grid: Option<Grid>,
    pub amount: u32,
    pub payload: serde_json::Value,
}

/// Acknowledgement returned by the game for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReceipt {
    pub action_code: ActionCode,
    /// Game-reported duration of the triggered task, if any.
    pub duration_ms: Option<u64>,
}

impl GameCommand {
    #[must_use]
    pub fn action_code(&self) -> ActionCode {
        match self {
            Self::Travel { .. } => ActionCode::Travel,
            Self::Move { .. } => ActionCode::Move,
            Self::Load { .. } => ActionCode::Load,
            Self::UnassignAll { .. } => ActionCode::UnassignAll,
            Self::Attack { .. } => ActionCode::Attack,
            Self::ApplyBoost { .. } => ActionCode::ApplyBoost,
            Self::Produce { .. } => ActionCode::Produce,
            Self::Recruit { .. } => ActionCode::Recruit,
            Self::CollectAll => ActionCode::CollectAll,
            Self::ReturnHome => ActionCode::ReturnHome,
        }
    }

    /// Lower into the flat [`Submission`] shape.
    #[must_use]
    pub fn to_submission(&self) -> Submission {
        let code = self.action_code();
        let (target_grid, amount, payload) = match self {
            Self::Travel { zone } => (None, 0, serde_json::json!({ "zone": zone })),
            Self::Move {
                participant, from, to,
            } => (
                Some(*to),
                0,
                serde_json::json!({ "participant": participant, "from": from }),
            ),
            Self::Load {
                participant,
                roster,
            } => (
                None,
                roster.total(),
                serde_json::json!({ "participant": participant, "roster": roster }),
            ),
            Self::UnassignAll { participants } => (
                None,
                0,
                serde_json::json!({ "participants": participants }),
            ),
            Self::Attack {
                participant,
                target,
                grid,
            } => (
                Some(*grid),
                0,
                serde_json::json!({ "participant": participant, "target": target }),
            ),
            Self::ApplyBoost {
                participant,
                item,
                target,
                grid,
            } => (
                *grid,
                1,
                serde_json::json!({ "participant": participant, "item": item, "target": target }),
            ),
            Self::Produce { item, amount } => (None, *amount, serde_json::json!({ "item": item })),
            Self::Recruit { unit, amount } => (None, *amount, serde_json::json!({ "unit": unit })),
            Self::CollectAll | Self::ReturnHome => (None, 0, serde_json::Value::Null),
        };
        Submission {
            action_code: code,
            target_grid,
            amount,
            payload,
        }
    }
}

impl std::fmt::Display for GameCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Travel { zone } => write!(f, "travel({zone})"),
            Self::Move {
                participant, to, ..
            } => write!(f, "move({participant} -> {to})"),
            Self::Load {
                participant,
                roster,
            } => write!(f, "load({participant}: {roster})"),
            Self::UnassignAll { participants } => {
                write!(f, "unassign_all({} specialists)", participants.len())
            }
            Self::Attack {
                participant,
                target,
                ..
            } => write!(f, "attack({participant} -> {target})"),
            Self::ApplyBoost { item, target, .. } => match target {
                Some(target) => write!(f, "apply_boost({item} -> {target})"),
                None => write!(f, "apply_boost({item})"),
            },
            Self::Produce { item, amount } => write!(f, "produce({amount} {item})"),
            Self::Recruit { unit, amount } => write!(f, "recruit({amount} {unit})"),
            Self::CollectAll => f.write_str("collect_all"),
            Self::ReturnHome => f.write_str("return_home"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_lower_move_into_submission_with_target_grid() {
        let cmd = GameCommand::Move {
            participant: ParticipantId::new(7),
            from: Some(Grid::new(10)),
            to: Grid::new(42),
        };
        let sub = cmd.to_submission();
        assert_eq!(sub.action_code, ActionCode::Move);
        assert_eq!(sub.target_grid, Some(Grid::new(42)));
        assert_eq!(sub.payload["participant"], 7);
    }

    #[test]
    fn should_carry_roster_total_as_amount_for_load() {
        let cmd = GameCommand::Load {
            participant: ParticipantId::new(1),
            roster: [("Swordsman", 10), ("Archer", 5)].into_iter().collect(),
        };
        let sub = cmd.to_submission();
        assert_eq!(sub.amount, 15);
        assert_eq!(sub.payload["roster"]["Swordsman"], 10);
    }

    #[test]
    fn should_display_commands_compactly() {
        let cmd = GameCommand::Recruit {
            unit: UnitType::new("Archer"),
            amount: 4,
        };
        assert_eq!(cmd.to_string(), "recruit(4 Archer)");
        assert_eq!(GameCommand::ReturnHome.to_string(), "return_home");
    }

    #[test]
    fn should_deserialize_tagged_command_from_json() {
        let json = serde_json::json!({"type": "produce", "item": "Bread", "amount": 20});
        let cmd: GameCommand = serde_json::from_value(json).unwrap();
        assert_eq!(
            cmd,
            GameCommand::Produce {
                item: "Bread".to_string(),
                amount: 20
            }
        );
    }
}
