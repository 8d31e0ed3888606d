//! Battle snapshot builder: gathers the live facts a wave needs and hands
//! them to the domain snapshot.

use marshal_domain::battle::{BattleSnapshot, BattleWave, ParticipantKind, WaveObservations};
use marshal_domain::id::BuildingId;

use crate::ports::GameState;

/// Query everything `wave` depends on.
pub fn observe_wave(wave: &BattleWave, game: &impl GameState) -> WaveObservations {
    let mut observations = WaveObservations::default();
    for participant in &wave.participants {
        match participant.kind {
            ParticipantKind::Unit => {
                if let Some(specialist) = game.specialist(participant.id) {
                    observations.specialists.insert(participant.id, specialist);
                }
            }
            ParticipantKind::Boost => {
                if let Some(item) = &participant.item {
                    observations
                        .item_stock
                        .insert(item.clone(), game.item_stock(item));
                }
            }
        }
    }
    let targets: Vec<BuildingId> = wave.targets().collect();
    observations.standing = game.hostiles_standing(&targets).into_iter().collect();
    observations
}

/// Build this tick's snapshot of `wave`.
pub fn build_snapshot(wave: &BattleWave, game: &impl GameState) -> BattleSnapshot {
    let snapshot = BattleSnapshot::build(wave, &observe_wave(wave, game));
    for id in snapshot.stale() {
        tracing::warn!(participant = %id, "participant no longer exists, dropped from wave");
    }
    snapshot
}
