//! # marshal-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum): the operator surface.
//!
//! ## Responsibilities
//! - Serve a **JSON API** to control the action scheduler
//!   (`/api/scheduler`, `/api/scheduler/run`, …)
//! - Select, clear and navigate the **plan** (`/api/plan`, …)
//! - Expose the **unit ledger** read-only (`/api/ledger`)
//! - Stream **scheduler events** over SSE (`/api/events/stream`)
//!
//! ## Dependency rule
//! Depends on `marshal-app` (scheduler handle, context, event bus) and
//! `marshal-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod testing;
