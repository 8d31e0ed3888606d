//! The battle sub-machine: one pure decision per evaluation tick.
//!
//! Every tick starts from the phase label and a freshly built
//! [`BattleSnapshot`]. Forward transitions that need no command chain
//! within the tick (`move` → `load` → `attack`) but stop on entering
//! `attack`, so attacks go out on the following evaluation. Regressions
//! (`attack` → `move` or `load`, `attacking` → `attack`) chain at once so
//! corrective commands are issued in the same tick.

use serde::Serialize;

use crate::battle::phase::BattlePhase;
use crate::battle::snapshot::{BattleParticipant, BattleSnapshot};
use crate::battle::wave::ParticipantKind;
use crate::command::GameCommand;
use crate::id::ParticipantId;
use crate::roster::Roster;

/// Upper bound on phase hops in a single tick.
const MAX_HOPS: usize = 4;

/// Inputs the machine needs besides the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct BattleContext<'a> {
    /// Units sitting unassigned at home.
    pub free: &'a Roster,
    /// Keep polling until every target is gone instead of finishing after
    /// the first volley.
    pub kill_all: bool,
    /// Floor for the wait before the next evaluation.
    pub min_wait_ms: u64,
}

/// Result of one evaluation tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleDecision {
    /// Phase to hold until the next tick; `None` once the wave is done.
    pub phase: Option<BattlePhase>,
    pub commands: Vec<GameCommand>,
    pub status: String,
    pub wait_ms: u64,
    /// The tick stopped on a structural deficit.
    pub blocked: bool,
}

impl BattleDecision {
    #[must_use]
    pub fn finished(&self) -> bool {
        self.phase.is_none()
    }
}

enum Tick {
    Chain(BattlePhase),
    Settle {
        phase: Option<BattlePhase>,
        commands: Vec<GameCommand>,
        status: String,
        blocked: bool,
    },
}

impl Tick {
    fn hold(phase: BattlePhase, status: impl Into<String>) -> Self {
        Self::Settle {
            phase: Some(phase),
            commands: Vec::new(),
            status: status.into(),
            blocked: false,
        }
    }

    fn act(phase: Option<BattlePhase>, commands: Vec<GameCommand>, status: impl Into<String>) -> Self {
        Self::Settle {
            phase,
            commands,
            status: status.into(),
            blocked: false,
        }
    }

    fn finish(status: impl Into<String>) -> Self {
        Self::act(None, Vec::new(), status)
    }
}

/// Decide what to do for a wave currently in `phase`.
#[must_use]
pub fn decide(phase: BattlePhase, snapshot: &BattleSnapshot, ctx: BattleContext<'_>) -> BattleDecision {
    let wait_ms = snapshot.longest_task_ms().max(ctx.min_wait_ms);

    if snapshot.is_empty() {
        return BattleDecision {
            phase: None,
            commands: Vec::new(),
            status: "no participants left in wave".to_string(),
            wait_ms,
            blocked: false,
        };
    }

    let mut current = phase;
    for _ in 0..MAX_HOPS {
        let tick = match current {
            BattlePhase::Move => move_phase(snapshot),
            BattlePhase::Load => load_phase(snapshot, ctx.free),
            BattlePhase::Attack => attack_phase(snapshot, ctx.kill_all),
            BattlePhase::Attacking => attacking_phase(snapshot),
        };
        match tick {
            Tick::Chain(next) => current = next,
            Tick::Settle {
                phase,
                commands,
                status,
                blocked,
            } => {
                return BattleDecision {
                    phase,
                    commands,
                    status,
                    wait_ms,
                    blocked,
                };
            }
        }
    }

    BattleDecision {
        phase: Some(current),
        commands: Vec::new(),
        status: format!("settling in {current}"),
        wait_ms,
        blocked: false,
    }
}

fn move_phase(snapshot: &BattleSnapshot) -> Tick {
    let total = snapshot.total();
    let on_grid = snapshot.on_grid();
    if on_grid == total {
        return Tick::Chain(BattlePhase::Load);
    }

    let in_transit = snapshot.en_route();
    if on_grid + in_transit < total {
        let commands: Vec<GameCommand> = snapshot
            .participants()
            .filter(|p| p.move_eligible)
            .map(|p| GameCommand::Move {
                participant: p.id,
                from: p.home_grid,
                to: p.target_grid,
            })
            .collect();
        if !commands.is_empty() {
            let status = format!("moving {} of {total} participants", commands.len());
            return Tick::act(Some(BattlePhase::Move), commands, status);
        }
        return Tick::hold(
            BattlePhase::Move,
            format!("waiting for {} busy participants", snapshot.busy()),
        );
    }

    Tick::hold(
        BattlePhase::Move,
        format!("{in_transit} participants in transit"),
    )
}

fn load_phase(snapshot: &BattleSnapshot, free: &Roster) -> Tick {
    let mismatched: Vec<&BattleParticipant> = snapshot
        .participants()
        .filter(|p| !p.roster_matched)
        .collect();
    if mismatched.is_empty() {
        return Tick::hold(BattlePhase::Attack, "armies loaded, ready to attack");
    }
    if mismatched.iter().any(|p| p.busy) {
        return Tick::hold(BattlePhase::Load, "waiting for busy participants before loading");
    }

    if free.covers(&snapshot.missing()) {
        let commands: Vec<GameCommand> = mismatched
            .iter()
            .map(|p| GameCommand::Load {
                participant: p.id,
                roster: p.required_roster.clone(),
            })
            .collect();
        let status = format!("loading {} participants", commands.len());
        return Tick::act(Some(BattlePhase::Load), commands, status);
    }

    // Unassigning the mismatched armies first may free enough units to
    // load everyone from scratch.
    let mut required = Roster::new();
    let mut pool = free.clone();
    for p in &mismatched {
        required.absorb(&p.required_roster);
        pool.absorb(&p.carried);
    }
    let carrying: Vec<ParticipantId> = mismatched
        .iter()
        .filter(|p| p.kind == ParticipantKind::Unit && !p.carried.is_empty())
        .map(|p| p.id)
        .collect();
    if pool.covers(&required) && !carrying.is_empty() {
        let status = format!("unassigning units of {} participants", carrying.len());
        return Tick::act(
            Some(BattlePhase::Load),
            vec![GameCommand::UnassignAll {
                participants: carrying,
            }],
            status,
        );
    }

    Tick::Settle {
        phase: Some(BattlePhase::Load),
        commands: Vec::new(),
        status: format!("missing {}", required.shortfall(&pool)),
        blocked: true,
    }
}

fn attack_phase(snapshot: &BattleSnapshot, kill_all: bool) -> Tick {
    let total = snapshot.total();
    if snapshot.on_grid() < total {
        return Tick::Chain(BattlePhase::Move);
    }
    if snapshot.matched() < total {
        return Tick::Chain(BattlePhase::Load);
    }

    let commands: Vec<GameCommand> = snapshot
        .participants()
        .filter(|p| p.attack_eligible)
        .filter_map(attack_command)
        .collect();
    if !commands.is_empty() {
        let status = format!("attacking with {} participants", commands.len());
        let next = kill_all.then_some(BattlePhase::Attacking);
        return Tick::act(next, commands, status);
    }

    if snapshot.hostiles_standing() == 0 {
        return Tick::finish("all targets cleared");
    }
    if snapshot.busy() > 0 {
        return Tick::hold(
            BattlePhase::Attack,
            format!("waiting for {} busy participants", snapshot.busy()),
        );
    }
    Tick::finish("nothing left to attack with")
}

fn attacking_phase(snapshot: &BattleSnapshot) -> Tick {
    let standing = snapshot.hostiles_standing();
    if standing == 0 {
        return Tick::finish("wave cleared");
    }
    // everybody is back from the fight yet targets still stand
    if snapshot.busy() == 0 {
        return Tick::Chain(BattlePhase::Attack);
    }
    Tick::hold(
        BattlePhase::Attacking,
        format!("{standing} hostile buildings standing"),
    )
}

fn attack_command(p: &BattleParticipant) -> Option<GameCommand> {
    match p.kind {
        ParticipantKind::Unit => p.target_id.map(|target| GameCommand::Attack {
            participant: p.id,
            target,
            grid: p.target_grid,
        }),
        ParticipantKind::Boost => p.item.clone().map(|item| GameCommand::ApplyBoost {
            participant: Some(p.id),
            item,
            target: p.target_id,
            grid: Some(p.target_grid),
        }),
    }
}
