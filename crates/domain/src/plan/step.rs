//! Steps: one typed unit of work inside a template.

use serde::{Deserialize, Serialize};

use crate::battle::BattleWave;
use crate::error::ValidationError;
use crate::zone::{Grid, Zone};

/// What a step does, with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    /// Travel to `zone`.
    TravelTo { zone: Zone },
    /// Let everybody leave the origin zone before going on.
    AwaitDeparture { seconds: u64 },
    /// Pick up every collectible of the zone.
    AwaitCollectibles,
    /// Keep a timed boost running.
    ApplyTimedBoost {
        item: String,
        #[serde(default)]
        target: Option<Grid>,
    },
    /// Have at least `amount` of `item` in stock.
    ProduceItem { item: String, amount: u32 },
    /// Move, load and attack with a set of participants.
    BattleWave(BattleWave),
    /// Only load armies onto the listed participants.
    LoadReinforcements(BattleWave),
    /// Go back to the home island.
    ReturnHome,
}

impl StepKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::TravelTo { .. } => "travel_to",
            Self::AwaitDeparture { .. } => "await_departure",
            Self::AwaitCollectibles => "await_collectibles",
            Self::ApplyTimedBoost { .. } => "apply_timed_boost",
            Self::ProduceItem { .. } => "produce_item",
            Self::BattleWave(_) => "battle_wave",
            Self::LoadReinforcements(_) => "load_reinforcements",
            Self::ReturnHome => "return_home",
        }
    }
}

/// A step of a plan: payload plus per-run flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub kind: StepKind,
    /// Battle waves only: poll until every target has fallen.
    #[serde(default)]
    pub kill_all: bool,
    /// The step's one-shot command has been issued (or, for a battle wave,
    /// the wave has been started).
    #[serde(skip)]
    pub applied: bool,
    /// The step was given up on during this run.
    #[serde(skip)]
    pub skip: bool,
}

impl Step {
    #[must_use]
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            kill_all: false,
            applied: false,
            skip: false,
        }
    }

    #[must_use]
    pub fn killing_all(mut self) -> Self {
        self.kill_all = true;
        self
    }

    pub(crate) fn clear_flags(&mut self) {
        self.applied = false;
        self.skip = false;
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ValidationError> {
        match &self.kind {
            StepKind::BattleWave(wave) | StepKind::LoadReinforcements(wave) => wave.validate(index),
            _ => Ok(()),
        }
    }
}

impl From<StepKind> for Step {
    fn from(kind: StepKind) -> Self {
        Self::new(kind)
    }
}
