//! # marshal-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `GameState`: read-only view of the mirrored game state
//!   - `CommandSink`: submit game commands
//!   - `EventPublisher`: publish scheduler events
//! - Run the **action scheduler**: one time-delayed dispatch chain with idle
//!   countdown and watchdog
//! - Evaluate **plan steps** and drive battle waves through the battle
//!   sub-machine
//! - Keep the **orchestration context** (selected plan, unit ledger, status)
//!   shared between the handler, the planners and the operator surface
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `marshal-domain` only (plus `tokio` for the scheduler actor).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod context;
pub mod event_bus;
pub mod ports;
pub mod scheduler;
pub mod services;
