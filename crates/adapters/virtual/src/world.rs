//! Simulated game state and the rules that move it forward.

use std::collections::{BTreeMap, HashMap};

use marshal_domain::command::GameCommand;
use marshal_domain::id::{BuildingId, ParticipantId};
use marshal_domain::roster::{Roster, UnitType};
use marshal_domain::specialist::{SpecialistObservation, SpecialistTask};
use marshal_domain::zone::Zone;

pub(crate) const TRAVEL_MS: u64 = 5_000;
pub(crate) const MOVE_MS: u64 = 4_000;
pub(crate) const ATTACK_MS: u64 = 6_000;
pub(crate) const BOOST_MS: u64 = 60_000;
pub(crate) const PRODUCE_MS: u64 = 3_000;
pub(crate) const RECRUIT_MS: u64 = 2_000;

#[derive(Debug, Clone)]
enum OrderKind {
    Produce(String),
    Recruit(UnitType),
}

#[derive(Debug, Clone)]
struct Order {
    kind: OrderKind,
    amount: u32,
    remaining_ms: u64,
}

/// Why the world refused a command.
pub(crate) type Rejection = String;

#[derive(Debug, Default)]
pub(crate) struct World {
    pub zone: Zone,
    pub travel: Option<(Zone, u64)>,
    pub specialists: BTreeMap<ParticipantId, SpecialistObservation>,
    pub free: Roster,
    /// Hostile buildings and the adventure they stand in.
    pub buildings: BTreeMap<BuildingId, String>,
    pub stock: HashMap<String, u32>,
    pub boosts: HashMap<String, u64>,
    pub collectibles: HashMap<String, usize>,
    orders: Vec<Order>,
}

impl World {
    /// Apply `command`, returning the duration of the task it started.
    pub fn apply(&mut self, command: &GameCommand) -> Result<Option<u64>, Rejection> {
        match command {
            GameCommand::Travel { zone } => self.start_travel(zone.clone()),
            GameCommand::ReturnHome => self.start_travel(Zone::Home),
            GameCommand::Move {
                participant, to, ..
            } => {
                let specialist = self.idle_specialist(*participant)?;
                specialist.task = SpecialistTask::Moving {
                    to: *to,
                    remaining_ms: MOVE_MS,
                };
                Ok(Some(MOVE_MS))
            }
            GameCommand::Load {
                participant,
                roster,
            } => self.load(*participant, roster).map(|()| None),
            GameCommand::UnassignAll { participants } => {
                for id in participants {
                    let carried = std::mem::take(&mut self.idle_specialist(*id)?.roster);
                    self.free.absorb(&carried);
                }
                Ok(None)
            }
            GameCommand::Attack {
                participant,
                target,
                ..
            } => {
                if !self.is_standing(*target) {
                    return Err(format!("building {target} is not standing"));
                }
                let specialist = self.idle_specialist(*participant)?;
                if specialist.grid.is_none() {
                    return Err(format!("specialist {participant} is not placed"));
                }
                specialist.task = SpecialistTask::Attacking {
                    target: *target,
                    remaining_ms: ATTACK_MS,
                };
                Ok(Some(ATTACK_MS))
            }
            GameCommand::ApplyBoost { item, target, .. } => {
                let count = self.stock.get(item).copied().unwrap_or(0);
                if count == 0 {
                    return Err(format!("no {item} in stock"));
                }
                self.stock.insert(item.clone(), count - 1);
                match target {
                    Some(building) => {
                        self.buildings.remove(building);
                    }
                    None => {
                        self.boosts.insert(item.clone(), BOOST_MS);
                    }
                }
                Ok(None)
            }
            GameCommand::Produce { item, amount } => {
                self.orders.push(Order {
                    kind: OrderKind::Produce(item.clone()),
                    amount: *amount,
                    remaining_ms: PRODUCE_MS,
                });
                Ok(Some(PRODUCE_MS))
            }
            GameCommand::Recruit { unit, amount } => {
                if self.zone != Zone::Home {
                    return Err("recruiting is only possible at home".to_string());
                }
                self.orders.push(Order {
                    kind: OrderKind::Recruit(unit.clone()),
                    amount: *amount,
                    remaining_ms: RECRUIT_MS,
                });
                Ok(Some(RECRUIT_MS))
            }
            GameCommand::CollectAll => {
                if let Zone::Adventure(name) = &self.zone {
                    self.collectibles.remove(name);
                }
                Ok(None)
            }
        }
    }

    /// Let `elapsed_ms` of game time pass.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if let Some((zone, remaining)) = self.travel.take() {
            if remaining <= elapsed_ms {
                self.arrive(zone);
            } else {
                self.travel = Some((zone, remaining - elapsed_ms));
            }
        }

        let mut destroyed = Vec::new();
        for specialist in self.specialists.values_mut() {
            let remaining = specialist.task.remaining_ms();
            if remaining > elapsed_ms {
                tick_task(&mut specialist.task, elapsed_ms);
                continue;
            }
            match std::mem::take(&mut specialist.task) {
                SpecialistTask::Moving { to, .. } => specialist.grid = Some(to),
                SpecialistTask::Attacking { target, .. } => destroyed.push(target),
                SpecialistTask::Busy { .. } | SpecialistTask::Idle => {}
            }
        }
        for target in destroyed {
            self.buildings.remove(&target);
        }

        self.boosts.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(elapsed_ms);
            *remaining > 0
        });

        let mut pending = Vec::new();
        for mut order in std::mem::take(&mut self.orders) {
            if order.remaining_ms > elapsed_ms {
                order.remaining_ms -= elapsed_ms;
                pending.push(order);
                continue;
            }
            match order.kind {
                OrderKind::Produce(item) => *self.stock.entry(item).or_default() += order.amount,
                OrderKind::Recruit(unit) => self.free.add(unit, order.amount),
            }
        }
        self.orders = pending;
    }

    pub fn hostiles_standing(&self, targets: &[BuildingId]) -> Vec<BuildingId> {
        targets
            .iter()
            .copied()
            .filter(|target| self.is_standing(*target))
            .collect()
    }

    pub fn collectibles_remaining(&self) -> usize {
        match &self.zone {
            Zone::Adventure(name) => self.collectibles.get(name).copied().unwrap_or(0),
            Zone::Home => 0,
        }
    }

    fn is_standing(&self, target: BuildingId) -> bool {
        match (&self.zone, self.buildings.get(&target)) {
            (Zone::Adventure(name), Some(adventure)) => adventure == name,
            _ => false,
        }
    }

    fn start_travel(&mut self, zone: Zone) -> Result<Option<u64>, Rejection> {
        if self.travel.is_some() {
            return Err("already travelling".to_string());
        }
        if self.zone == zone {
            return Err(format!("already at {zone}"));
        }
        self.travel = Some((zone, TRAVEL_MS));
        Ok(Some(TRAVEL_MS))
    }

    fn arrive(&mut self, zone: Zone) {
        // specialists come along but have to be placed again
        for specialist in self.specialists.values_mut() {
            specialist.grid = None;
            specialist.task = SpecialistTask::Idle;
        }
        self.zone = zone;
    }

    fn idle_specialist(&mut self, id: ParticipantId) -> Result<&mut SpecialistObservation, Rejection> {
        let specialist = self
            .specialists
            .get_mut(&id)
            .ok_or_else(|| format!("unknown specialist {id}"))?;
        if specialist.is_busy() {
            return Err(format!("specialist {id} is busy"));
        }
        Ok(specialist)
    }

    fn load(&mut self, id: ParticipantId, roster: &Roster) -> Result<(), Rejection> {
        let carried = self.idle_specialist(id)?.roster.clone();
        let mut pool = self.free.clone();
        pool.absorb(&carried);
        if !pool.covers(roster) {
            return Err(format!("missing {}", roster.shortfall(&pool)));
        }
        for (unit, count) in roster.iter() {
            pool.remove(unit, count);
        }
        self.free = pool;
        if let Some(specialist) = self.specialists.get_mut(&id) {
            specialist.roster = roster.clone();
        }
        Ok(())
    }
}

fn tick_task(task: &mut SpecialistTask, elapsed_ms: u64) {
    match task {
        SpecialistTask::Moving { remaining_ms, .. }
        | SpecialistTask::Attacking { remaining_ms, .. }
        | SpecialistTask::Busy { remaining_ms } => *remaining_ms -= elapsed_ms,
        SpecialistTask::Idle => {}
    }
}
