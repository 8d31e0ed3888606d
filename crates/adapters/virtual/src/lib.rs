//! # marshal-adapter-virtual
//!
//! A simulated game for demos and end-to-end tests.
//!
//! [`VirtualWorld`] mirrors a small game: the player's zone, specialists with
//! their armies and running tasks, free units at home, hostile buildings per
//! adventure, item stock, timed boosts and collectibles. It answers the
//! [`GameState`] queries and accepts commands through [`CommandSink`]. Time
//! only moves when [`VirtualWorld::advance`] is called.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `travel` / `return_home` | arrives after 5s; specialists must be placed again |
//! | `move` | specialist reaches the cell after 4s |
//! | `load` / `unassign_all` | immediate, units move between free pool and specialist |
//! | `attack` | target building is destroyed after 6s |
//! | `apply_boost` | consumes one item; destroys the target or starts a 60s boost |
//! | `produce` / `recruit` | stock or free units grow after 3s / 2s |
//! | `collect_all` | clears the current adventure's collectibles |
//!
//! ## Dependency rule
//!
//! Depends on `marshal-app` (port traits) and `marshal-domain` only.

mod decode;
mod world;

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use marshal_app::ports::{CommandSink, GameState};
use marshal_domain::command::{CommandReceipt, Submission};
use marshal_domain::error::{CommandError, MarshalError};
use marshal_domain::id::{BuildingId, ParticipantId};
use marshal_domain::roster::Roster;
use marshal_domain::specialist::{SpecialistObservation, SpecialistTask};
use marshal_domain::zone::{Grid, Zone};

use world::World;

/// Simulated game shared by the automation and the daemon's ticker.
#[derive(Debug, Default)]
pub struct VirtualWorld {
    state: Mutex<World>,
}

impl VirtualWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The world the daemon starts with: one adventure with three camps,
    /// two specialists and a modest army at home.
    #[must_use]
    pub fn demo() -> Self {
        Self::new()
            .with_specialist(1, "Vargus")
            .with_specialist(2, "Anselm")
            .with_free([("Recruit", 120), ("Bowman", 60), ("Cavalry", 20)].into_iter().collect())
            .with_building("Outlaws", 900)
            .with_building("Outlaws", 901)
            .with_building("Outlaws", 902)
            .with_collectibles("Outlaws", 5)
            .with_stock("Fish Platter", 2)
    }

    /// Add an idle, unplaced specialist without army.
    #[must_use]
    pub fn with_specialist(self, id: u64, name: &str) -> Self {
        let id = ParticipantId::new(id);
        self.lock().specialists.insert(
            id,
            SpecialistObservation {
                id,
                name: name.to_string(),
                grid: None,
                roster: Roster::new(),
                task: SpecialistTask::Idle,
            },
        );
        self
    }

    #[must_use]
    pub fn with_free(self, units: Roster) -> Self {
        self.lock().free.absorb(&units);
        self
    }

    /// Add a hostile building standing in `adventure`.
    #[must_use]
    pub fn with_building(self, adventure: &str, id: u64) -> Self {
        self.lock()
            .buildings
            .insert(BuildingId::new(id), adventure.to_string());
        self
    }

    #[must_use]
    pub fn with_stock(self, item: &str, count: u32) -> Self {
        self.lock().stock.insert(item.to_string(), count);
        self
    }

    #[must_use]
    pub fn with_collectibles(self, adventure: &str, count: usize) -> Self {
        self.lock().collectibles.insert(adventure.to_string(), count);
        self
    }

    /// Place a specialist on a grid cell directly, bypassing the move task.
    pub fn place(&self, id: ParticipantId, grid: Grid) {
        if let Some(specialist) = self.lock().specialists.get_mut(&id) {
            specialist.grid = Some(grid);
        }
    }

    /// Let `elapsed` of game time pass.
    pub fn advance(&self, elapsed: Duration) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.lock().advance(elapsed_ms);
    }

    fn lock(&self) -> MutexGuard<'_, World> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GameState for VirtualWorld {
    fn location(&self) -> Zone {
        self.lock().zone.clone()
    }

    fn specialists(&self) -> Vec<SpecialistObservation> {
        self.lock().specialists.values().cloned().collect()
    }

    fn specialist(&self, id: ParticipantId) -> Option<SpecialistObservation> {
        self.lock().specialists.get(&id).cloned()
    }

    fn home_squads(&self) -> Vec<Roster> {
        let world = self.lock();
        if world.free.is_empty() {
            Vec::new()
        } else {
            vec![world.free.clone()]
        }
    }

    fn hostiles_standing(&self, targets: &[BuildingId]) -> Vec<BuildingId> {
        self.lock().hostiles_standing(targets)
    }

    fn item_stock(&self, item: &str) -> u32 {
        self.lock().stock.get(item).copied().unwrap_or(0)
    }

    fn boost_active(&self, item: &str) -> bool {
        self.lock().boosts.contains_key(item)
    }

    fn collectibles_remaining(&self) -> usize {
        self.lock().collectibles_remaining()
    }
}

impl CommandSink for VirtualWorld {
    fn submit(
        &self,
        submission: Submission,
    ) -> impl Future<Output = Result<CommandReceipt, MarshalError>> + Send {
        let action_code = submission.action_code;
        let result: Result<CommandReceipt, MarshalError> = decode::decode(&submission)
            .and_then(|command| {
                tracing::debug!(%command, "virtual world applying command");
                self.lock().apply(&command)
            })
            .map(|duration_ms| CommandReceipt {
                action_code,
                duration_ms,
            })
            .map_err(|reason| {
                tracing::warn!(%action_code, %reason, "virtual world rejected command");
                CommandError {
                    action_code: action_code.to_string(),
                    reason,
                }
                .into()
            });
        async move { result }
    }
}
