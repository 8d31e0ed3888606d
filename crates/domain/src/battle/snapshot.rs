//! Battle snapshot: a per-tick status view of every wave participant.
//!
//! A snapshot is derived from scratch on each evaluation from the wave
//! payload plus fresh observations. Nothing is carried over between ticks.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::battle::wave::{BattleWave, ParticipantKind, WaveParticipant};
use crate::id::{BuildingId, ParticipantId};
use crate::roster::Roster;
use crate::specialist::SpecialistObservation;
use crate::zone::Grid;

/// Live game facts a snapshot is derived from.
#[derive(Debug, Clone, Default)]
pub struct WaveObservations {
    pub specialists: HashMap<ParticipantId, SpecialistObservation>,
    /// Hostile buildings that are still standing.
    pub standing: HashSet<BuildingId>,
    /// Stock of boost items by name.
    pub item_stock: HashMap<String, u32>,
}

/// Status of one participant for the current tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleParticipant {
    pub id: ParticipantId,
    pub kind: ParticipantKind,
    pub required_roster: Roster,
    pub carried: Roster,
    /// Where the participant currently stands.
    pub home_grid: Option<Grid>,
    pub target_grid: Grid,
    pub target_id: Option<BuildingId>,
    pub item: Option<String>,
    pub busy: bool,
    pub on_target_grid: bool,
    /// Busy walking to the target grid.
    pub en_route: bool,
    pub roster_matched: bool,
    pub move_eligible: bool,
    pub attack_eligible: bool,
    pub action_duration_ms: u64,
}

impl BattleParticipant {
    /// Units still missing from the carried army.
    #[must_use]
    pub fn deficit(&self) -> Roster {
        self.required_roster.shortfall(&self.carried)
    }

    fn from_specialist(wanted: &WaveParticipant, obs: &SpecialistObservation, standing: bool) -> Self {
        let busy = obs.is_busy();
        let on_target_grid = obs.grid == Some(wanted.grid);
        let en_route = obs.task.heading_to() == Some(wanted.grid);
        let roster_matched = obs.roster == wanted.roster;
        Self {
            id: wanted.id,
            kind: ParticipantKind::Unit,
            required_roster: wanted.roster.clone(),
            carried: obs.roster.clone(),
            home_grid: obs.grid,
            target_grid: wanted.grid,
            target_id: wanted.target,
            item: None,
            busy,
            on_target_grid,
            en_route,
            roster_matched,
            move_eligible: !busy && !on_target_grid,
            attack_eligible: !busy && on_target_grid && roster_matched && standing,
            action_duration_ms: obs.task.remaining_ms(),
        }
    }

    fn from_boost(wanted: &WaveParticipant, in_stock: bool, standing: bool) -> Self {
        Self {
            id: wanted.id,
            kind: ParticipantKind::Boost,
            required_roster: Roster::new(),
            carried: Roster::new(),
            home_grid: Some(wanted.grid),
            target_grid: wanted.grid,
            target_id: wanted.target,
            item: wanted.item.clone(),
            busy: false,
            on_target_grid: true,
            en_route: false,
            roster_matched: true,
            move_eligible: false,
            attack_eligible: in_stock && standing,
            action_duration_ms: 0,
        }
    }
}

/// Every participant of a wave keyed by id, plus derived aggregates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BattleSnapshot {
    participants: BTreeMap<ParticipantId, BattleParticipant>,
    /// Participants named by the wave that the game no longer knows.
    stale: Vec<ParticipantId>,
    /// Wave targets still standing.
    hostiles_standing: usize,
}

impl BattleSnapshot {
    /// Derive a snapshot for `wave` from `observations`.
    #[must_use]
    pub fn build(wave: &BattleWave, observations: &WaveObservations) -> Self {
        let mut participants = BTreeMap::new();
        let mut stale = Vec::new();

        for wanted in &wave.participants {
            // a participant without a target has nothing to attack and
            // only needs to stand and be loaded
            let standing = wanted
                .target
                .is_some_and(|t| observations.standing.contains(&t));
            let status = match wanted.kind {
                ParticipantKind::Unit => match observations.specialists.get(&wanted.id) {
                    Some(obs) => BattleParticipant::from_specialist(wanted, obs, standing),
                    None => {
                        stale.push(wanted.id);
                        continue;
                    }
                },
                ParticipantKind::Boost => {
                    let in_stock = wanted
                        .item
                        .as_ref()
                        .and_then(|item| observations.item_stock.get(item))
                        .is_some_and(|count| *count > 0);
                    BattleParticipant::from_boost(wanted, in_stock, standing)
                }
            };
            participants.insert(wanted.id, status);
        }

        let targets: HashSet<BuildingId> = wave.targets().collect();
        let hostiles_standing = targets
            .iter()
            .filter(|t| observations.standing.contains(*t))
            .count();

        Self {
            participants,
            stale,
            hostiles_standing,
        }
    }

    /// Assemble a snapshot directly from participant statuses.
    #[must_use]
    pub fn from_participants(
        participants: impl IntoIterator<Item = BattleParticipant>,
        hostiles_standing: usize,
    ) -> Self {
        Self {
            participants: participants.into_iter().map(|p| (p.id, p)).collect(),
            stale: Vec::new(),
            hostiles_standing,
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &BattleParticipant> {
        self.participants.values()
    }

    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<&BattleParticipant> {
        self.participants.get(&id)
    }

    #[must_use]
    pub fn stale(&self) -> &[ParticipantId] {
        &self.stale
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn busy(&self) -> usize {
        self.count(|p| p.busy)
    }

    #[must_use]
    pub fn matched(&self) -> usize {
        self.count(|p| p.roster_matched)
    }

    #[must_use]
    pub fn on_grid(&self) -> usize {
        self.count(|p| p.on_target_grid)
    }

    /// Participants walking to their grid that have not arrived yet.
    #[must_use]
    pub fn en_route(&self) -> usize {
        self.count(|p| p.en_route && !p.on_target_grid)
    }

    #[must_use]
    pub fn hostiles_standing(&self) -> usize {
        self.hostiles_standing
    }

    /// Union of every participant's missing units. Matched participants
    /// contribute nothing.
    #[must_use]
    pub fn missing(&self) -> Roster {
        let mut missing = Roster::new();
        for p in self.participants.values() {
            missing.absorb(&p.deficit());
        }
        missing
    }

    /// Longest remaining task among busy participants.
    #[must_use]
    pub fn longest_task_ms(&self) -> u64 {
        self.participants
            .values()
            .map(|p| p.action_duration_ms)
            .max()
            .unwrap_or(0)
    }

    fn count(&self, pred: impl Fn(&BattleParticipant) -> bool) -> usize {
        self.participants.values().filter(|&p| pred(p)).count()
    }
}
