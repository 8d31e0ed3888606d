//! Event bus port: publish/subscribe for scheduler events.

use std::future::Future;

use marshal_domain::error::MarshalError;
use marshal_domain::event::Event;

/// Publishes events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), MarshalError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), MarshalError>> + Send {
        (**self).publish(event)
    }
}
