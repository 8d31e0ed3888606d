//! External state query port: a read-only view of the mirrored game state.
//!
//! Queries are synchronous: adapters answer them from a local mirror that is
//! kept up to date out of band.

use marshal_domain::id::{BuildingId, ParticipantId};
use marshal_domain::roster::Roster;
use marshal_domain::specialist::SpecialistObservation;
use marshal_domain::zone::Zone;

pub trait GameState: Send + Sync {
    /// Zone the player is currently in.
    fn location(&self) -> Zone;

    /// Every owned specialist.
    fn specialists(&self) -> Vec<SpecialistObservation>;

    /// One specialist, `None` when the game no longer knows it.
    fn specialist(&self, id: ParticipantId) -> Option<SpecialistObservation>;

    /// Unassigned unit squads sitting at home.
    fn home_squads(&self) -> Vec<Roster>;

    /// The subset of `targets` still standing in the current zone.
    fn hostiles_standing(&self, targets: &[BuildingId]) -> Vec<BuildingId>;

    /// How many of `item` are in stock.
    fn item_stock(&self, item: &str) -> u32;

    /// Whether a timed boost of `item` is running.
    fn boost_active(&self, item: &str) -> bool;

    /// Collectibles left lying around in the current zone.
    fn collectibles_remaining(&self) -> usize;
}

impl<T: GameState> GameState for std::sync::Arc<T> {
    fn location(&self) -> Zone {
        (**self).location()
    }

    fn specialists(&self) -> Vec<SpecialistObservation> {
        (**self).specialists()
    }

    fn specialist(&self, id: ParticipantId) -> Option<SpecialistObservation> {
        (**self).specialist(id)
    }

    fn home_squads(&self) -> Vec<Roster> {
        (**self).home_squads()
    }

    fn hostiles_standing(&self, targets: &[BuildingId]) -> Vec<BuildingId> {
        (**self).hostiles_standing(targets)
    }

    fn item_stock(&self, item: &str) -> u32 {
        (**self).item_stock(item)
    }

    fn boost_active(&self, item: &str) -> bool {
        (**self).boost_active(item)
    }

    fn collectibles_remaining(&self) -> usize {
        (**self).collectibles_remaining()
    }
}
