//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod ledger;
#[allow(clippy::missing_errors_doc)]
pub mod plan;
#[allow(clippy::missing_errors_doc)]
pub mod scheduler;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Scheduler
        .route("/scheduler", get(scheduler::status))
        .route("/scheduler/run", post(scheduler::run))
        .route("/scheduler/skip", post(scheduler::skip))
        .route("/scheduler/repeat", post(scheduler::repeat))
        .route("/scheduler/insert-next", post(scheduler::insert_next))
        // Plan
        .route(
            "/plan",
            get(plan::get).put(plan::select).delete(plan::clear),
        )
        .route("/plan/next", post(plan::next))
        .route("/plan/previous", post(plan::previous))
        .route("/plan/steps/{index}", post(plan::go_to))
        // Ledger
        .route("/ledger", get(ledger::get))
        // Events
        .route("/events/stream", get(sse::stream))
}
