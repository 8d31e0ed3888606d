//! Server-Sent Events (SSE) stream of scheduler events.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use marshal_app::event_bus::InProcessEventBus;
use marshal_domain::event::Event as SchedulerEvent;

use crate::state::AppState;

/// `GET /api/events/stream`: SSE stream of scheduler events.
///
/// Opens with the last event the scheduler published, then sends every new
/// event as a JSON `data:` frame named after its kind (`cycle_started`,
/// `idle_tick`, …). The stream ends when the client disconnects or the bus
/// is closed.
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let frames = scheduler_events(&state.event_bus).filter_map(|event| {
        match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().event(event.kind.name()).data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event to JSON for SSE stream");
                None
            }
        }
    });

    Sse::new(frames).keep_alive(KeepAlive::default())
}

/// The latest event followed by live ones, without the latest twice.
fn scheduler_events(bus: &InProcessEventBus) -> impl Stream<Item = SchedulerEvent> + use<> {
    let subscription = bus.resume();
    let replayed = subscription.latest.as_ref().map(|event| event.id);
    let live = BroadcastStream::new(subscription.receiver).filter_map(move |result| match result {
        Ok(event) if Some(event.id) == replayed => None,
        Ok(event) => Some(event),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged, some events were dropped");
            None
        }
    });
    tokio_stream::iter(subscription.latest).chain(live)
}
