//! Plans: a resumable run of a [`Template`].
//!
//! The cursor only moves forward through [`Plan::advance_step`], apart from
//! explicit operator navigation. Whenever the step under the cursor
//! changes, the phase returns to [`Phase::Idle`] and the new step's
//! runtime flags are cleared.

mod outcome;
mod step;
mod template;

pub use outcome::StepOutcome;
pub use step::{Step, StepKind};
pub use template::{DEFAULT_DEPARTURE_SECS, Template};

use serde::{Deserialize, Serialize};

use crate::battle::BattlePhase;
use crate::error::ValidationError;
use crate::id::TemplateId;
use crate::time::Timestamp;

/// Sub-state of the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Battle(BattlePhase),
}

impl Phase {
    #[must_use]
    pub fn battle(self) -> Option<BattlePhase> {
        match self {
            Self::Idle => None,
            Self::Battle(phase) => Some(phase),
        }
    }
}

/// A template being executed.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    template_id: TemplateId,
    name: String,
    steps: Vec<Step>,
    cursor: usize,
    phase: Phase,
    repeats_remaining: u32,
    cycle_started: Option<Timestamp>,
    step_started: Option<Timestamp>,
}

impl Plan {
    /// Build a plan from a validated template, guarding every adventure
    /// travel with a departure wait.
    ///
    /// # Errors
    ///
    /// Returns the template's first validation error.
    pub fn from_template(template: Template, repeats: u32) -> Result<Self, ValidationError> {
        template.validate()?;
        Ok(Self {
            template_id: template.id,
            name: template.name,
            steps: template::with_departure_guards(template.steps),
            cursor: 0,
            phase: Phase::Idle,
            repeats_remaining: repeats,
            cycle_started: None,
            step_started: None,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    #[must_use]
    pub fn repeats_remaining(&self) -> u32 {
        self.repeats_remaining
    }

    #[must_use]
    pub fn cycle_started(&self) -> Option<Timestamp> {
        self.cycle_started
    }

    #[must_use]
    pub fn step_started(&self) -> Option<Timestamp> {
        self.step_started
    }

    /// The step under the cursor; `None` once every step has run.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.cursor)
    }

    pub fn current_step_mut(&mut self) -> Option<&mut Step> {
        self.steps.get_mut(self.cursor)
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Record the start of a cycle unless one is already running.
    pub fn mark_cycle_started(&mut self, now: Timestamp) {
        self.cycle_started.get_or_insert(now);
    }

    /// Record when the current step started waiting, once.
    pub fn mark_step_started(&mut self, now: Timestamp) -> Timestamp {
        *self.step_started.get_or_insert(now)
    }

    /// Move to the next step. Returns `false` when the plan is exhausted.
    pub fn advance_step(&mut self) -> bool {
        self.enter(self.cursor + 1);
        !self.is_exhausted()
    }

    /// Start the next repeat, or give the plan up when none remain.
    #[must_use]
    pub fn reset_cycle(mut self) -> Option<Self> {
        if self.repeats_remaining == 0 {
            return None;
        }
        self.repeats_remaining -= 1;
        self.cycle_started = None;
        for step in &mut self.steps {
            step.clear_flags();
        }
        self.enter(0);
        Some(self)
    }

    /// Jump to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StepOutOfRange`] when `index` is past the
    /// last step.
    pub fn go_to_step(&mut self, index: usize) -> Result<(), ValidationError> {
        if index >= self.steps.len() {
            return Err(ValidationError::StepOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        self.enter(index);
        Ok(())
    }

    /// Jump to the step after the current one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StepOutOfRange`] on the last step.
    pub fn next_step(&mut self) -> Result<(), ValidationError> {
        self.go_to_step(self.cursor + 1)
    }

    /// Jump to the step before the current one; restarts the first step.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StepOutOfRange`] for a plan without steps.
    pub fn previous_step(&mut self) -> Result<(), ValidationError> {
        self.go_to_step(self.cursor.saturating_sub(1))
    }

    fn enter(&mut self, index: usize) {
        self.cursor = index;
        self.phase = Phase::Idle;
        self.step_started = None;
        if let Some(step) = self.steps.get_mut(index) {
            step.clear_flags();
        }
    }
}
