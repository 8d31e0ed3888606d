//! Action handler: executes what the scheduler dispatches.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use marshal_domain::action::{Action, ScheduledAction};
use marshal_domain::command::GameCommand;
use marshal_domain::error::MarshalError;
use marshal_domain::plan::{Plan, StepKind, StepOutcome};
use marshal_domain::time::now;

use crate::context::OrchestrationContext;
use crate::ports::{CommandSink, GameState};
use crate::scheduler::{ActionHandler, HandlerOutcome};
use crate::services::evaluator::{Evaluation, evaluate_step};
use crate::services::ledger;

/// Handles every [`Action`] against the game ports and the shared context.
pub struct AutomationHandler<G, C> {
    game: G,
    sink: C,
    context: Arc<OrchestrationContext>,
    evaluation_interval: Duration,
}

impl<G: GameState, C: CommandSink> AutomationHandler<G, C> {
    pub fn new(
        game: G,
        sink: C,
        context: Arc<OrchestrationContext>,
        evaluation_interval: Duration,
    ) -> Self {
        Self {
            game,
            sink,
            context,
            evaluation_interval,
        }
    }

    async fn submit(&self, command: &GameCommand) -> Result<HandlerOutcome, MarshalError> {
        let receipt = match self.sink.submit(command.to_submission()).await {
            Ok(receipt) => receipt,
            Err(err) => {
                self.rearm_step(command);
                return Err(err);
            }
        };
        tracing::debug!(
            action_code = %receipt.action_code,
            duration_ms = ?receipt.duration_ms,
            "command accepted"
        );
        Ok(HandlerOutcome::proceed())
    }

    /// Let the current step issue `command` again on its next evaluation.
    fn rearm_step(&self, command: &GameCommand) {
        self.context.with_plan(|slot| {
            let step = slot.as_mut().and_then(Plan::current_step_mut);
            if let Some(step) = step
                && step.applied
                && issued_once_by(&step.kind, command)
            {
                tracing::info!(step = step.kind.label(), %command, "command rejected, step will retry");
                step.applied = false;
            }
        });
    }

    /// Evaluate the current step and turn the outcome into follow-ups.
    #[tracing::instrument(skip(self))]
    fn evaluate_plan(&self) -> HandlerOutcome {
        let ledger = ledger::refresh(&self.context, &self.game);
        let evaluation = Evaluation {
            game: &self.game,
            ledger: &ledger,
            interval: self.evaluation_interval,
            now: now(),
        };

        let evaluated = self.context.with_plan(|slot| {
            let plan = slot.as_mut()?;
            plan.mark_cycle_started(evaluation.now);
            let outcome = evaluate_step(plan, &evaluation);
            if outcome.advance && !plan.advance_step() {
                *slot = slot.take().and_then(Plan::reset_cycle);
                match slot.as_ref() {
                    Some(plan) => tracing::info!(
                        plan = plan.name(),
                        repeats_remaining = plan.repeats_remaining(),
                        "plan repeats"
                    ),
                    None => tracing::info!("plan finished"),
                }
            }
            Some((outcome, slot.is_some()))
        });

        let Some((outcome, plan_alive)) = evaluated else {
            return HandlerOutcome::proceed();
        };
        if let Some(status) = &outcome.status {
            self.context.set_status(status.clone());
        } else if !plan_alive {
            self.context.set_status("plan finished");
        }
        self.follow_ups(outcome, plan_alive)
    }

    /// Commands run in this cycle; the plan is evaluated again in the next
    /// one, right away after an advance and after the step's interval while
    /// it waits.
    fn follow_ups(&self, outcome: StepOutcome, plan_alive: bool) -> HandlerOutcome {
        let handled = HandlerOutcome::proceed()
            .then(outcome.commands.into_iter().map(ScheduledAction::submit));
        if !plan_alive {
            return handled;
        }
        let wait = if outcome.advance {
            Duration::ZERO
        } else {
            self.evaluation_interval
        };
        handled.next_cycle_in(outcome.next_interval.unwrap_or(wait))
    }
}

/// Whether `command` is the one-shot command `kind` issues when first visited.
fn issued_once_by(kind: &StepKind, command: &GameCommand) -> bool {
    match (kind, command) {
        (StepKind::TravelTo { zone }, GameCommand::Travel { zone: travel }) => zone == travel,
        (StepKind::AwaitCollectibles, GameCommand::CollectAll)
        | (StepKind::ReturnHome, GameCommand::ReturnHome) => true,
        (
            StepKind::ApplyTimedBoost { item, .. },
            GameCommand::ApplyBoost {
                item: issued,
                participant: None,
                ..
            },
        )
        | (StepKind::ProduceItem { item, .. }, GameCommand::Produce { item: issued, .. }) => {
            item == issued
        }
        _ => false,
    }
}

impl<G, C> ActionHandler for AutomationHandler<G, C>
where
    G: GameState,
    C: CommandSink,
{
    fn handle(
        &self,
        action: &Action,
    ) -> impl Future<Output = Result<HandlerOutcome, MarshalError>> + Send {
        let action = action.clone();
        async move {
            match action {
                Action::StatusMarker { cycle } => {
                    self.context.set_status(format!("cycle {cycle} started"));
                    Ok(HandlerOutcome::proceed())
                }
                Action::EvaluatePlan => Ok(self.evaluate_plan()),
                Action::Submit { command } => self.submit(&command).await,
                Action::RefreshLedger => {
                    ledger::refresh(&self.context, &self.game);
                    Ok(HandlerOutcome::proceed())
                }
                Action::Wait => Ok(HandlerOutcome::proceed()),
            }
        }
    }
}
