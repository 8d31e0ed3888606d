//! Scheduler event fan-out.
//!
//! Live events go through a tokio [`broadcast`] channel. The last event is
//! also kept aside so that an operator who connects between
//! two idle ticks sees where the scheduler stands without waiting for the
//! next event.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use marshal_domain::error::MarshalError;
use marshal_domain::event::Event;

use crate::ports::EventPublisher;

pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
    latest: Mutex<Option<Event>>,
}

/// A live subscription opened together with the last event seen before it.
pub struct Subscription {
    pub latest: Option<Event>,
    pub receiver: broadcast::Receiver<Event>,
}

impl InProcessEventBus {
    /// `capacity` bounds how far a subscriber may fall behind before it
    /// starts losing events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            latest: Mutex::new(None),
        }
    }

    /// Events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// The most recent event, if anything was ever published.
    #[must_use]
    pub fn latest(&self) -> Option<Event> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe and capture the latest event in one go.
    ///
    /// The latest event is read after subscribing, so it can also arrive on
    /// the receiver; compare ids to drop the duplicate.
    #[must_use]
    pub fn resume(&self) -> Subscription {
        let receiver = self.sender.subscribe();
        Subscription {
            latest: self.latest(),
            receiver,
        }
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), MarshalError>> + Send {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(event.clone());
        // fails only without receivers
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use marshal_domain::action::ScheduledAction;
    use marshal_domain::event::SchedulerEvent;

    use super::*;
    use crate::scheduler::{ActionHandler, HandlerOutcome, Planner, Scheduler, SchedulerConfig};

    struct Noop;

    impl ActionHandler for Noop {
        fn handle(
            &self,
            _action: &marshal_domain::action::Action,
        ) -> impl Future<Output = Result<HandlerOutcome, MarshalError>> + Send {
            async { Ok(HandlerOutcome::proceed()) }
        }
    }

    struct Nothing;

    impl Planner for Nothing {
        fn name(&self) -> &'static str {
            "nothing"
        }

        fn plan(&self) -> Vec<ScheduledAction> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn should_have_no_latest_event_before_first_publish() {
        let bus = InProcessEventBus::new(4);

        let subscription = bus.resume();

        assert!(bus.latest().is_none());
        assert!(subscription.latest.is_none());
    }

    #[tokio::test]
    async fn should_keep_latest_event_without_subscribers() {
        let bus = InProcessEventBus::new(4);

        bus.publish(Event::new(SchedulerEvent::IdleStarted { ticks: 10 }))
            .await
            .unwrap();
        bus.publish(Event::new(SchedulerEvent::IdleTick { remaining: 9 }))
            .await
            .unwrap();

        assert_eq!(
            bus.latest().map(|e| e.kind),
            Some(SchedulerEvent::IdleTick { remaining: 9 })
        );
    }

    #[tokio::test]
    async fn should_resume_with_latest_then_live_events() {
        let bus = InProcessEventBus::new(4);
        bus.publish(Event::new(SchedulerEvent::CycleStarted { cycle: 4, queued: 2 }))
            .await
            .unwrap();

        let mut subscription = bus.resume();
        bus.publish(Event::new(SchedulerEvent::IdleStarted { ticks: 10 }))
            .await
            .unwrap();

        let latest = subscription.latest.clone().unwrap();
        assert_eq!(latest.kind, SchedulerEvent::CycleStarted { cycle: 4, queued: 2 });
        let live = subscription.receiver.recv().await.unwrap();
        assert_ne!(live.id, latest.id);
        assert_eq!(live.kind, SchedulerEvent::IdleStarted { ticks: 10 });
    }

    #[tokio::test]
    async fn should_report_lag_when_subscriber_falls_behind_idle_ticks() {
        let bus = InProcessEventBus::new(2);
        let mut rx = bus.subscribe();

        for remaining in (0..5).rev() {
            bus.publish(Event::new(SchedulerEvent::IdleTick { remaining }))
                .await
                .unwrap();
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        let next = rx.recv().await.unwrap();
        assert_eq!(next.kind, SchedulerEvent::IdleTick { remaining: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn should_track_scheduler_lifecycle_as_latest_event() {
        let bus = Arc::new(InProcessEventBus::new(64));
        let planners: Vec<Box<dyn Planner>> = vec![Box::new(Nothing)];
        let (handle, task) = Scheduler::spawn(SchedulerConfig::default(), Noop, planners, Arc::clone(&bus));

        handle.run().await.unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        let idling = bus.latest().map(|e| e.kind);
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        assert_eq!(idling, Some(SchedulerEvent::IdleTick { remaining: 7 }));
        assert_eq!(bus.latest().map(|e| e.kind), Some(SchedulerEvent::Stopped));
    }
}
