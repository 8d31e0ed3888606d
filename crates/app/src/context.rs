//! Orchestration context: the state shared by the handler, the planners
//! and the operator surface.
//!
//! Locks are short and never held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use marshal_domain::error::{MarshalError, ValidationError};
use marshal_domain::ledger::UnitLedger;
use marshal_domain::plan::Plan;
use marshal_domain::time::{Timestamp, now};

/// Last human-readable status of the automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub message: String,
    pub at: Timestamp,
}

#[derive(Debug, Default)]
pub struct OrchestrationContext {
    plan: Mutex<Option<Plan>>,
    ledger: Mutex<UnitLedger>,
    status: Mutex<Option<StatusLine>>,
}

impl OrchestrationContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `plan` the selected plan, replacing any previous one.
    pub fn select_plan(&self, plan: Plan) {
        tracing::info!(plan = plan.name(), steps = plan.steps().len(), "plan selected");
        *lock(&self.plan) = Some(plan);
    }

    /// Drop the selected plan, returning it.
    pub fn clear_plan(&self) -> Option<Plan> {
        lock(&self.plan).take()
    }

    #[must_use]
    pub fn plan(&self) -> Option<Plan> {
        lock(&self.plan).clone()
    }

    #[must_use]
    pub fn has_plan(&self) -> bool {
        lock(&self.plan).is_some()
    }

    /// Run `f` with exclusive access to the plan slot.
    pub fn with_plan<R>(&self, f: impl FnOnce(&mut Option<Plan>) -> R) -> R {
        f(&mut lock(&self.plan))
    }

    /// Apply an operator navigation to the selected plan.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoPlan`] when no plan is selected, or the
    /// error returned by `f`.
    pub fn navigate(
        &self,
        f: impl FnOnce(&mut Plan) -> Result<(), ValidationError>,
    ) -> Result<Plan, MarshalError> {
        let mut slot = lock(&self.plan);
        let plan = slot.as_mut().ok_or(ValidationError::NoPlan)?;
        f(plan)?;
        Ok(plan.clone())
    }

    #[must_use]
    pub fn ledger(&self) -> UnitLedger {
        lock(&self.ledger).clone()
    }

    pub fn replace_ledger(&self, ledger: UnitLedger) {
        *lock(&self.ledger) = ledger;
    }

    pub fn set_status(&self, message: impl Into<String>) {
        *lock(&self.status) = Some(StatusLine {
            message: message.into(),
            at: now(),
        });
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusLine> {
        lock(&self.status).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
