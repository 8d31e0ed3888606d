//! Step evaluators: one per step kind, chosen by an exhaustive match.
//!
//! Each evaluator looks at the step under the cursor and the live game
//! state and returns a [`StepOutcome`]. One-shot commands are guarded by
//! the step's `applied` flag so they are issued once per visit.

use std::time::Duration;

use marshal_domain::battle::{BattleContext, BattlePhase, BattleWave, decide};
use marshal_domain::command::GameCommand;
use marshal_domain::ledger::UnitLedger;
use marshal_domain::plan::{Phase, Plan, StepKind, StepOutcome};
use marshal_domain::time::{Timestamp, elapsed_ms};
use marshal_domain::zone::{Grid, Zone};

use crate::ports::GameState;
use crate::services::snapshot::build_snapshot;

/// Everything an evaluation reads besides the plan.
pub struct Evaluation<'a, G> {
    pub game: &'a G,
    pub ledger: &'a UnitLedger,
    /// Default wait before the step is looked at again.
    pub interval: Duration,
    pub now: Timestamp,
}

/// Evaluate the current step of `plan`. An exhausted plan advances.
pub fn evaluate_step<G: GameState>(plan: &mut Plan, eval: &Evaluation<'_, G>) -> StepOutcome {
    let Some(step) = plan.current_step() else {
        return StepOutcome::advance();
    };
    let kind = step.kind.clone();
    let kill_all = step.kill_all;

    match kind {
        StepKind::TravelTo { zone } => travel_to(plan, eval, zone),
        StepKind::AwaitDeparture { seconds } => await_departure(plan, eval, seconds),
        StepKind::AwaitCollectibles => await_collectibles(plan, eval),
        StepKind::ApplyTimedBoost { item, target } => apply_timed_boost(plan, eval, item, target),
        StepKind::ProduceItem { item, amount } => produce_item(plan, eval, item, amount),
        StepKind::BattleWave(wave) => battle_wave(plan, eval, &wave, kill_all),
        StepKind::LoadReinforcements(wave) => load_reinforcements(eval, &wave),
        StepKind::ReturnHome => return_home(plan, eval),
    }
}

/// Wait with `status`, issuing `command` only on the first visit.
fn once(plan: &mut Plan, command: GameCommand, status: String) -> StepOutcome {
    let outcome = StepOutcome::wait(status);
    match plan.current_step_mut() {
        Some(step) if !step.applied => {
            step.applied = true;
            outcome.with_command(command)
        }
        _ => outcome,
    }
}

fn travel_to<G: GameState>(plan: &mut Plan, eval: &Evaluation<'_, G>, zone: Zone) -> StepOutcome {
    if eval.game.location() == zone {
        return StepOutcome::advance().with_status(format!("arrived at {zone}"));
    }
    let status = format!("travelling to {zone}");
    once(plan, GameCommand::Travel { zone }, status)
}

fn await_departure<G: GameState>(plan: &mut Plan, eval: &Evaluation<'_, G>, seconds: u64) -> StepOutcome {
    let started = plan.mark_step_started(eval.now);
    let waited = elapsed_ms(started, eval.now);
    let total = seconds.saturating_mul(1000);
    if waited >= total {
        return StepOutcome::advance();
    }
    let left = total - waited;
    StepOutcome::wait(format!("waiting {}s for departure", left.div_ceil(1000)))
        .with_interval(Duration::from_millis(left))
}

fn await_collectibles<G: GameState>(plan: &mut Plan, eval: &Evaluation<'_, G>) -> StepOutcome {
    let remaining = eval.game.collectibles_remaining();
    if remaining == 0 {
        return StepOutcome::advance().with_status("all collectibles picked up");
    }
    once(
        plan,
        GameCommand::CollectAll,
        format!("{remaining} collectibles left"),
    )
}

fn apply_timed_boost<G: GameState>(
    plan: &mut Plan,
    eval: &Evaluation<'_, G>,
    item: String,
    target: Option<Grid>,
) -> StepOutcome {
    if eval.game.boost_active(&item) {
        return StepOutcome::advance().with_status(format!("{item} active"));
    }
    let applied = plan.current_step().is_some_and(|s| s.applied);
    if !applied && eval.game.item_stock(&item) == 0 {
        tracing::warn!(%item, "boost out of stock, skipping step");
        if let Some(step) = plan.current_step_mut() {
            step.skip = true;
        }
        return StepOutcome::advance().with_status(format!("no {item} in stock, skipped"));
    }
    let status = format!("applying {item}");
    once(
        plan,
        GameCommand::ApplyBoost {
            participant: None,
            item,
            target: None,
            grid: target,
        },
        status,
    )
}

fn produce_item<G: GameState>(
    plan: &mut Plan,
    eval: &Evaluation<'_, G>,
    item: String,
    amount: u32,
) -> StepOutcome {
    let stock = eval.game.item_stock(&item);
    if stock >= amount {
        return StepOutcome::advance().with_status(format!("{stock} {item} in stock"));
    }
    let missing = amount - stock;
    let status = format!("producing {missing} {item}");
    once(
        plan,
        GameCommand::Produce {
            item,
            amount: missing,
        },
        status,
    )
}

fn battle_wave<G: GameState>(
    plan: &mut Plan,
    eval: &Evaluation<'_, G>,
    wave: &BattleWave,
    kill_all: bool,
) -> StepOutcome {
    let phase = match plan.phase().battle() {
        Some(phase) => phase,
        None => {
            let started = plan.current_step().is_some_and(|s| s.applied);
            if started {
                return StepOutcome::advance();
            }
            if let Some(step) = plan.current_step_mut() {
                step.applied = true;
            }
            BattlePhase::Move
        }
    };

    let snapshot = build_snapshot(wave, eval.game);
    let decision = decide(
        phase,
        &snapshot,
        BattleContext {
            free: eval.ledger.free(),
            kill_all,
            min_wait_ms: millis(eval.interval),
        },
    );
    tracing::debug!(
        from = %phase,
        to = ?decision.phase,
        commands = decision.commands.len(),
        status = %decision.status,
        "battle tick"
    );
    if decision.blocked {
        tracing::warn!(status = %decision.status, "battle wave blocked");
    }

    match decision.phase {
        Some(next) => {
            plan.set_phase(Phase::Battle(next));
            StepOutcome::wait(decision.status)
                .with_commands(decision.commands)
                .with_interval(Duration::from_millis(decision.wait_ms))
        }
        None => {
            plan.set_phase(Phase::Idle);
            StepOutcome::advance()
                .with_status(decision.status)
                .with_commands(decision.commands)
        }
    }
}

fn load_reinforcements<G: GameState>(eval: &Evaluation<'_, G>, wave: &BattleWave) -> StepOutcome {
    let snapshot = build_snapshot(wave, eval.game);
    let decision = decide(
        BattlePhase::Load,
        &snapshot,
        BattleContext {
            free: eval.ledger.free(),
            kill_all: false,
            min_wait_ms: millis(eval.interval),
        },
    );
    if decision.phase == Some(BattlePhase::Load) {
        if decision.blocked {
            tracing::warn!(status = %decision.status, "reinforcements blocked");
        }
        return StepOutcome::wait(decision.status)
            .with_commands(decision.commands)
            .with_interval(Duration::from_millis(decision.wait_ms));
    }
    StepOutcome::advance().with_status("reinforcements loaded")
}

fn return_home<G: GameState>(plan: &mut Plan, eval: &Evaluation<'_, G>) -> StepOutcome {
    if eval.game.location() == Zone::Home {
        return StepOutcome::advance().with_status("back home");
    }
    once(plan, GameCommand::ReturnHome, "returning home".to_string())
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use marshal_domain::battle::{ParticipantKind, WaveParticipant};
    use marshal_domain::id::{BuildingId, ParticipantId, TemplateId};
    use marshal_domain::plan::{Step, Template};
    use marshal_domain::time::now;

    use super::*;
    use crate::services::fakes::{FakeGame, roster};

    fn plan_of(steps: Vec<Step>) -> Plan {
        Plan::from_template(
            Template {
                id: TemplateId::new(),
                name: "test".to_string(),
                steps,
            },
            0,
        )
        .unwrap()
    }

    fn eval<'a>(game: &'a FakeGame, ledger: &'a UnitLedger) -> Evaluation<'a, FakeGame> {
        Evaluation {
            game,
            ledger,
            interval: Duration::from_secs(3),
            now: now(),
        }
    }

    fn swordsmen_wave() -> BattleWave {
        BattleWave {
            participants: vec![WaveParticipant {
                id: ParticipantId::new(1),
                kind: ParticipantKind::Unit,
                roster: roster(&[("Swordsman", 10)]),
                grid: Grid::new(42),
                target: Some(BuildingId::new(900)),
                item: None,
            }],
        }
    }

    #[test]
    fn should_issue_travel_once_when_not_at_destination() {
        let zone = Zone::Adventure("Outlaws".to_string());
        let mut plan = plan_of(vec![Step::new(StepKind::TravelTo { zone: zone.clone() })]);
        let game = FakeGame::default();
        let ledger = UnitLedger::default();

        let first = evaluate_step(&mut plan, &eval(&game, &ledger));
        let second = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert_eq!(first.commands, vec![GameCommand::Travel { zone }]);
        assert!(!first.advance);
        assert!(second.commands.is_empty());
        assert!(!second.advance);
    }

    #[test]
    fn should_advance_when_already_at_destination() {
        let zone = Zone::Adventure("Outlaws".to_string());
        let mut plan = plan_of(vec![Step::new(StepKind::TravelTo { zone: zone.clone() })]);
        let game = FakeGame::default().at(zone);
        let ledger = UnitLedger::default();

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert!(outcome.advance);
    }

    #[test]
    fn should_wait_remaining_departure_time() {
        let mut plan = plan_of(vec![Step::new(StepKind::AwaitDeparture { seconds: 20 })]);
        let game = FakeGame::default();
        let ledger = UnitLedger::default();
        let start = now();

        let first = evaluate_step(
            &mut plan,
            &Evaluation {
                game: &game,
                ledger: &ledger,
                interval: Duration::from_secs(3),
                now: start,
            },
        );
        let later = evaluate_step(
            &mut plan,
            &Evaluation {
                game: &game,
                ledger: &ledger,
                interval: Duration::from_secs(3),
                now: start + chrono::Duration::seconds(20),
            },
        );

        assert!(!first.advance);
        assert_eq!(first.next_interval, Some(Duration::from_secs(20)));
        assert!(later.advance);
    }

    #[test]
    fn should_skip_boost_step_when_out_of_stock() {
        let mut plan = plan_of(vec![Step::new(StepKind::ApplyTimedBoost {
            item: "Fish Platter".to_string(),
            target: None,
        })]);
        let game = FakeGame::default();
        let ledger = UnitLedger::default();

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert!(outcome.advance);
        assert!(outcome.commands.is_empty());
        assert!(plan.current_step().unwrap().skip);
    }

    #[test]
    fn should_apply_boost_when_in_stock() {
        let mut plan = plan_of(vec![Step::new(StepKind::ApplyTimedBoost {
            item: "Fish Platter".to_string(),
            target: Some(Grid::new(12)),
        })]);
        let game = FakeGame::default().with_stock("Fish Platter", 2);
        let ledger = UnitLedger::default();

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert_eq!(
            outcome.commands,
            vec![GameCommand::ApplyBoost {
                participant: None,
                item: "Fish Platter".to_string(),
                target: None,
                grid: Some(Grid::new(12)),
            }]
        );
    }

    #[test]
    fn should_produce_only_the_shortfall() {
        let mut plan = plan_of(vec![Step::new(StepKind::ProduceItem {
            item: "Bread".to_string(),
            amount: 50,
        })]);
        let game = FakeGame::default().with_stock("Bread", 30);
        let ledger = UnitLedger::default();

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert_eq!(
            outcome.commands,
            vec![GameCommand::Produce {
                item: "Bread".to_string(),
                amount: 20,
            }]
        );
    }

    #[test]
    fn should_start_wave_in_move_phase_and_issue_moves() {
        let mut plan = plan_of(vec![Step::new(StepKind::BattleWave(swordsmen_wave()))]);
        let game = FakeGame::default().with_specialist(1, Some(3), roster(&[]));
        let ledger = UnitLedger::default();

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert_eq!(plan.phase(), Phase::Battle(BattlePhase::Move));
        assert!(matches!(outcome.commands[..], [GameCommand::Move { .. }]));
        assert!(plan.current_step().unwrap().applied);
    }

    #[test]
    fn should_report_deficit_when_free_units_are_short() {
        let mut plan = plan_of(vec![Step::new(StepKind::BattleWave(swordsmen_wave()))]);
        let game = FakeGame::default()
            .with_specialist(1, Some(42), roster(&[]))
            .with_home(roster(&[("Swordsman", 4)]))
            .with_standing(900);
        let ledger = UnitLedger::from_scan(&game.home_squads(), std::iter::empty());

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert_eq!(plan.phase(), Phase::Battle(BattlePhase::Load));
        assert!(outcome.commands.is_empty());
        assert_eq!(outcome.status.as_deref(), Some("missing 6 Swordsman"));
        assert!(!outcome.advance);
    }

    #[test]
    fn should_advance_after_single_pass_attack() {
        let mut plan = plan_of(vec![Step::new(StepKind::BattleWave(swordsmen_wave()))]);
        plan.set_phase(Phase::Battle(BattlePhase::Attack));
        plan.current_step_mut().unwrap().applied = true;
        let game = FakeGame::default()
            .with_specialist(1, Some(42), roster(&[("Swordsman", 10)]))
            .with_standing(900);
        let ledger = UnitLedger::default();

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert!(outcome.advance);
        assert!(matches!(outcome.commands[..], [GameCommand::Attack { .. }]));
        assert_eq!(plan.phase(), Phase::Idle);
    }

    #[test]
    fn should_advance_reinforcements_once_every_roster_matches() {
        let mut plan = plan_of(vec![Step::new(StepKind::LoadReinforcements(swordsmen_wave()))]);
        let game = FakeGame::default().with_specialist(1, Some(3), roster(&[("Swordsman", 10)]));
        let ledger = UnitLedger::default();

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert!(outcome.advance);
        assert!(outcome.commands.is_empty());
    }

    #[test]
    fn should_load_reinforcements_from_free_units() {
        let mut plan = plan_of(vec![Step::new(StepKind::LoadReinforcements(swordsmen_wave()))]);
        let game = FakeGame::default()
            .with_specialist(1, Some(3), roster(&[]))
            .with_home(roster(&[("Swordsman", 12)]));
        let ledger = UnitLedger::from_scan(&game.home_squads(), std::iter::empty());

        let outcome = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert!(!outcome.advance);
        assert!(matches!(outcome.commands[..], [GameCommand::Load { .. }]));
    }

    #[test]
    fn should_issue_return_home_once_when_away() {
        let mut plan = plan_of(vec![Step::new(StepKind::ReturnHome)]);
        let game = FakeGame::default().at(Zone::Adventure("Outlaws".to_string()));
        let ledger = UnitLedger::default();

        let first = evaluate_step(&mut plan, &eval(&game, &ledger));
        let second = evaluate_step(&mut plan, &eval(&game, &ledger));

        assert_eq!(first.commands, vec![GameCommand::ReturnHome]);
        assert!(second.commands.is_empty());
    }
}
