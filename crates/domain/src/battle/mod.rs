//! Battle-wave handling: the wave payload, per-tick snapshots of its
//! participants and the move/load/attack/attacking decision function.

pub mod machine;
pub mod phase;
pub mod snapshot;
pub mod wave;

pub use machine::{BattleContext, BattleDecision, decide};
pub use phase::BattlePhase;
pub use snapshot::{BattleParticipant, BattleSnapshot, WaveObservations};
pub use wave::{BattleWave, ParticipantKind, WaveParticipant};
