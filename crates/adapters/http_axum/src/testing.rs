//! Test fixtures shared by the handler tests.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use tokio::task::JoinHandle;

use marshal_app::context::OrchestrationContext;
use marshal_app::event_bus::InProcessEventBus;
use marshal_app::scheduler::{ActionHandler, HandlerOutcome, Scheduler, SchedulerConfig};
use marshal_domain::action::Action;
use marshal_domain::error::MarshalError;

use crate::state::AppState;

pub(crate) struct NoopHandler;

impl ActionHandler for NoopHandler {
    fn handle(
        &self,
        _action: &Action,
    ) -> impl Future<Output = Result<HandlerOutcome, MarshalError>> + Send {
        async { Ok(HandlerOutcome::proceed()) }
    }
}

/// A running scheduler without planners, wired into fresh state.
pub(crate) fn test_state() -> (AppState, JoinHandle<()>) {
    let event_bus = Arc::new(InProcessEventBus::new(16));
    let (scheduler, task) = Scheduler::spawn(
        SchedulerConfig::default(),
        NoopHandler,
        Vec::new(),
        Arc::clone(&event_bus),
    );
    let state = AppState::new(scheduler, Arc::new(OrchestrationContext::new()), event_bus);
    (state, task)
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub(crate) fn json_body(value: &serde_json::Value) -> Body {
    Body::from(value.to_string())
}
