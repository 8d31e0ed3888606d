//! Templates: the saved, operator-authored sequence of steps.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::TemplateId;
use crate::plan::step::{Step, StepKind};

/// Grace period of the departure wait injected after adventure travel.
pub const DEFAULT_DEPARTURE_SECS: u64 = 10;

/// An automation template as stored by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: TemplateId,
    pub name: String,
    pub steps: Vec<Step>,
}

impl Template {
    /// Parse a template document and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Malformed`] when the document does not
    /// parse, or the first invariant violation found by [`Self::validate`].
    pub fn parse(document: &str) -> Result<Self, ValidationError> {
        let template: Self =
            serde_json::from_str(document).map_err(|err| ValidationError::Malformed(err.to_string()))?;
        template.validate()?;
        Ok(template)
    }

    /// Check every load-time invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violation: empty name, no steps, or an invalid
    /// battle wave.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }
        self.steps
            .iter()
            .enumerate()
            .try_for_each(|(index, step)| step.validate(index))
    }
}

/// Make sure every travel to an adventure is followed by a departure wait.
pub(crate) fn with_departure_guards(steps: Vec<Step>) -> Vec<Step> {
    let mut guarded = Vec::with_capacity(steps.len());
    let mut iter = steps.into_iter().peekable();
    while let Some(step) = iter.next() {
        let needs_guard = matches!(&step.kind, StepKind::TravelTo { zone } if zone.is_adventure())
            && !matches!(
                iter.peek().map(|next| &next.kind),
                Some(StepKind::AwaitDeparture { .. })
            );
        guarded.push(step);
        if needs_guard {
            guarded.push(Step::new(StepKind::AwaitDeparture {
                seconds: DEFAULT_DEPARTURE_SECS,
            }));
        }
    }
    guarded
}
