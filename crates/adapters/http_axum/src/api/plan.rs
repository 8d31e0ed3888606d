//! Plan selection and operator navigation.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use marshal_app::context::StatusLine;
use marshal_domain::error::{MarshalError, NotFoundError};
use marshal_domain::plan::{Plan, Template};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body of `PUT /api/plan`.
#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    pub template: Template,
    /// Extra passes after the first one.
    #[serde(default)]
    pub repeats: u32,
}

/// The selected plan together with the last status line.
#[derive(Debug, Serialize)]
pub struct PlanView {
    pub plan: Plan,
    pub status: Option<StatusLine>,
}

/// Possible responses from the select endpoint.
pub enum SelectResponse {
    Selected(Json<Plan>),
}

impl IntoResponse for SelectResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Selected(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/plan`
pub async fn get(State(state): State<AppState>) -> Result<Json<PlanView>, ApiError> {
    let plan = state.context.plan().ok_or_else(no_plan)?;
    Ok(Json(PlanView {
        plan,
        status: state.context.status(),
    }))
}

/// `PUT /api/plan`: validate a template and make it the selected plan.
///
/// A new scheduler cycle starts right away so the plan is picked up.
pub async fn select(
    State(state): State<AppState>,
    Json(body): Json<SelectPlanRequest>,
) -> Result<SelectResponse, ApiError> {
    let plan = Plan::from_template(body.template, body.repeats)?;
    state.context.select_plan(plan.clone());
    state.scheduler.run().await?;
    Ok(SelectResponse::Selected(Json(plan)))
}

/// `DELETE /api/plan`
pub async fn clear(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let plan = state.context.clear_plan().ok_or_else(no_plan)?;
    tracing::info!(plan = plan.name(), "plan cleared by operator");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/plan/next`
pub async fn next(State(state): State<AppState>) -> Result<Json<Plan>, ApiError> {
    Ok(Json(state.context.navigate(Plan::next_step)?))
}

/// `POST /api/plan/previous`
pub async fn previous(State(state): State<AppState>) -> Result<Json<Plan>, ApiError> {
    Ok(Json(state.context.navigate(Plan::previous_step)?))
}

/// `POST /api/plan/steps/{index}`
pub async fn go_to(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Plan>, ApiError> {
    Ok(Json(
        state.context.navigate(|plan| plan.go_to_step(index))?,
    ))
}

fn no_plan() -> MarshalError {
    NotFoundError {
        entity: "Plan",
        id: "selected".to_string(),
    }
    .into()
}
