//! Scheduler control handlers.

use std::time::Duration;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use marshal_app::scheduler::SchedulerStatus;
use marshal_domain::action::ScheduledAction;
use marshal_domain::command::GameCommand;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of `POST /api/scheduler/repeat`.
#[derive(Debug, Default, Deserialize)]
pub struct RepeatQuery {
    pub delay_ms: Option<u64>,
}

/// Request body of `POST /api/scheduler/insert-next`.
#[derive(Debug, Deserialize)]
pub struct InsertNextRequest {
    pub command: GameCommand,
    /// Delay before the inserted command; the base delay when absent.
    pub delay_ms: Option<u64>,
}

/// `GET /api/scheduler`
pub async fn status(State(state): State<AppState>) -> Result<Json<SchedulerStatus>, ApiError> {
    Ok(Json(state.scheduler.status().await?))
}

/// `POST /api/scheduler/run`: start a new cycle now.
pub async fn run(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.scheduler.run().await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /api/scheduler/skip`: dispatch the next action right away.
pub async fn skip(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.scheduler.skip().await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /api/scheduler/repeat?delay_ms=…`, dispatch the last action again.
pub async fn repeat(
    State(state): State<AppState>,
    Query(query): Query<RepeatQuery>,
) -> Result<StatusCode, ApiError> {
    state
        .scheduler
        .repeat(query.delay_ms.map(Duration::from_millis))
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /api/scheduler/insert-next`: make a command the next dispatch.
pub async fn insert_next(
    State(state): State<AppState>,
    Json(body): Json<InsertNextRequest>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(command = %body.command, "operator inserted command");
    state
        .scheduler
        .insert_next(
            ScheduledAction::submit(body.command),
            body.delay_ms.map(Duration::from_millis),
        )
        .await?;
    Ok(StatusCode::ACCEPTED)
}
