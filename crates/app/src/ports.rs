//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod command_sink;
pub mod event_bus;
pub mod game_state;

pub use command_sink::CommandSink;
pub use event_bus::EventPublisher;
pub use game_state::GameState;
