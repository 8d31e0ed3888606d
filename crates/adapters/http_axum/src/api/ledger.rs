//! Read-only view of the unit ledger.

use axum::Json;
use axum::extract::State;

use marshal_domain::ledger::UnitLedger;

use crate::state::AppState;

/// `GET /api/ledger`: the ledger as of the last refresh.
pub async fn get(State(state): State<AppState>) -> Json<UnitLedger> {
    Json(state.context.ledger())
}
