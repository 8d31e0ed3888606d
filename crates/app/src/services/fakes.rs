//! In-memory port fakes shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;

use marshal_domain::command::{CommandReceipt, Submission};
use marshal_domain::error::MarshalError;
use marshal_domain::id::{BuildingId, ParticipantId};
use marshal_domain::roster::Roster;
use marshal_domain::specialist::{SpecialistObservation, SpecialistTask};
use marshal_domain::zone::{Grid, Zone};

use crate::ports::{CommandSink, GameState};

pub(crate) struct FakeGame {
    pub location: Mutex<Zone>,
    pub specialists: Mutex<HashMap<ParticipantId, SpecialistObservation>>,
    pub home: Mutex<Vec<Roster>>,
    pub standing: Mutex<HashSet<BuildingId>>,
    pub stock: Mutex<HashMap<String, u32>>,
    pub boosts: Mutex<HashSet<String>>,
    pub collectibles: Mutex<usize>,
}

impl Default for FakeGame {
    fn default() -> Self {
        Self {
            location: Mutex::new(Zone::Home),
            specialists: Mutex::new(HashMap::new()),
            home: Mutex::new(Vec::new()),
            standing: Mutex::new(HashSet::new()),
            stock: Mutex::new(HashMap::new()),
            boosts: Mutex::new(HashSet::new()),
            collectibles: Mutex::new(0),
        }
    }
}

impl FakeGame {
    pub fn at(self, zone: Zone) -> Self {
        *self.location.lock().unwrap() = zone;
        self
    }

    pub fn with_home(self, squad: Roster) -> Self {
        self.home.lock().unwrap().push(squad);
        self
    }

    pub fn with_specialist(self, id: u64, grid: Option<u32>, roster: Roster) -> Self {
        let obs = SpecialistObservation {
            id: ParticipantId::new(id),
            name: format!("General {id}"),
            grid: grid.map(Grid::new),
            roster,
            task: SpecialistTask::Idle,
        };
        self.specialists.lock().unwrap().insert(obs.id, obs);
        self
    }

    pub fn with_standing(self, building: u64) -> Self {
        self.standing.lock().unwrap().insert(BuildingId::new(building));
        self
    }

    pub fn with_stock(self, item: &str, count: u32) -> Self {
        self.stock.lock().unwrap().insert(item.to_string(), count);
        self
    }
}

impl GameState for FakeGame {
    fn location(&self) -> Zone {
        self.location.lock().unwrap().clone()
    }

    fn specialists(&self) -> Vec<SpecialistObservation> {
        self.specialists.lock().unwrap().values().cloned().collect()
    }

    fn specialist(&self, id: ParticipantId) -> Option<SpecialistObservation> {
        self.specialists.lock().unwrap().get(&id).cloned()
    }

    fn home_squads(&self) -> Vec<Roster> {
        self.home.lock().unwrap().clone()
    }

    fn hostiles_standing(&self, targets: &[BuildingId]) -> Vec<BuildingId> {
        let standing = self.standing.lock().unwrap();
        targets.iter().copied().filter(|t| standing.contains(t)).collect()
    }

    fn item_stock(&self, item: &str) -> u32 {
        self.stock.lock().unwrap().get(item).copied().unwrap_or(0)
    }

    fn boost_active(&self, item: &str) -> bool {
        self.boosts.lock().unwrap().contains(item)
    }

    fn collectibles_remaining(&self) -> usize {
        *self.collectibles.lock().unwrap()
    }
}

#[derive(Default)]
pub(crate) struct SpySink {
    pub submitted: Mutex<Vec<Submission>>,
    pub reject: Mutex<Option<String>>,
}

impl CommandSink for SpySink {
    fn submit(
        &self,
        submission: Submission,
    ) -> impl Future<Output = Result<CommandReceipt, MarshalError>> + Send {
        let code = submission.action_code;
        let rejection = self.reject.lock().unwrap().clone();
        let result = match rejection {
            Some(reason) => Err(marshal_domain::error::CommandError {
                action_code: code.to_string(),
                reason,
            }
            .into()),
            None => {
                self.submitted.lock().unwrap().push(submission);
                Ok(CommandReceipt {
                    action_code: code,
                    duration_ms: None,
                })
            }
        };
        async move { result }
    }
}

pub(crate) fn roster(entries: &[(&str, u32)]) -> Roster {
    entries.iter().map(|(u, c)| (*u, *c)).collect()
}
