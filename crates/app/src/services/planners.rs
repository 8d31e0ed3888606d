//! Cycle planners: what each `run()` puts behind the status marker.

use std::sync::Arc;

use marshal_domain::action::{Action, ScheduledAction};
use marshal_domain::command::GameCommand;
use marshal_domain::roster::Roster;
use marshal_domain::zone::Zone;

use crate::context::OrchestrationContext;
use crate::ports::GameState;
use crate::scheduler::Planner;
use crate::services::ledger;

/// Enqueues a plan evaluation while a plan is selected.
pub struct AdventurePlanner {
    context: Arc<OrchestrationContext>,
}

impl AdventurePlanner {
    #[must_use]
    pub fn new(context: Arc<OrchestrationContext>) -> Self {
        Self { context }
    }
}

impl Planner for AdventurePlanner {
    fn name(&self) -> &'static str {
        "adventure"
    }

    fn plan(&self) -> Vec<ScheduledAction> {
        if self.context.has_plan() {
            vec![ScheduledAction::new(Action::EvaluatePlan)]
        } else {
            Vec::new()
        }
    }
}

/// Tops the owned army up to a target roster.
///
/// Only recruits at home, where the barracks are. The ledger is rescanned
/// when the cycle is planned and again once the recruits are submitted.
pub struct RecruitmentPlanner<G> {
    game: G,
    context: Arc<OrchestrationContext>,
    target: Roster,
}

impl<G: GameState> RecruitmentPlanner<G> {
    pub fn new(game: G, context: Arc<OrchestrationContext>, target: Roster) -> Self {
        Self {
            game,
            context,
            target,
        }
    }
}

impl<G: GameState> Planner for RecruitmentPlanner<G> {
    fn name(&self) -> &'static str {
        "recruitment"
    }

    fn plan(&self) -> Vec<ScheduledAction> {
        if self.target.is_empty() || self.game.location() != Zone::Home {
            return Vec::new();
        }
        let ledger = ledger::refresh(&self.context, &self.game);
        let missing = self.target.shortfall(ledger.total());
        if missing.is_empty() {
            return Vec::new();
        }
        tracing::info!(%missing, "recruiting");

        let mut actions: Vec<ScheduledAction> = missing
            .iter()
            .map(|(unit, amount)| {
                ScheduledAction::submit(GameCommand::Recruit {
                    unit: unit.clone(),
                    amount,
                })
            })
            .collect();
        actions.push(ScheduledAction::new(Action::RefreshLedger));
        actions
    }
}
