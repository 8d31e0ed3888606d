//! Shared application state for axum handlers.

use std::sync::Arc;

use marshal_app::context::OrchestrationContext;
use marshal_app::event_bus::InProcessEventBus;
use marshal_app::scheduler::SchedulerHandle;

/// Application state shared across all axum handlers.
///
/// Everything inside is a cheap handle, so cloning per request is fine.
#[derive(Clone)]
pub struct AppState {
    /// Control channel of the running scheduler.
    pub scheduler: SchedulerHandle,
    /// Selected plan, unit ledger and status line.
    pub context: Arc<OrchestrationContext>,
    /// Bus the scheduler publishes its events on.
    pub event_bus: Arc<InProcessEventBus>,
}

impl AppState {
    pub fn new(
        scheduler: SchedulerHandle,
        context: Arc<OrchestrationContext>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            scheduler,
            context,
            event_bus,
        }
    }
}
