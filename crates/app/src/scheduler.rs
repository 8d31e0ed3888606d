//! Action scheduler: a single time-delayed dispatch chain.
//!
//! The scheduler is an actor task that owns the [`ActionQueue`] and at most
//! one pending timer. Arming a timer replaces the previous one, so there is
//! never more than one live dispatch chain. Control operations reach the
//! actor through a [`SchedulerHandle`]; handlers run inside the actor, one
//! at a time. A watchdog restarts the cycle when dispatching looks stalled,
//! including while a handler is still running.

mod config;
mod handle;
mod handler;
mod planner;
mod queue;
pub mod watchdog;

pub use config::SchedulerConfig;
pub use handle::{SchedulerHandle, SchedulerStatus};
pub use handler::{ActionHandler, Continuation, HandlerOutcome};
pub use planner::Planner;
pub use queue::ActionQueue;

use std::error::Error as _;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use marshal_domain::action::{Action, ScheduledAction};
use marshal_domain::error::MarshalError;
use marshal_domain::event::{Event, SchedulerEvent};

use crate::ports::EventPublisher;
use handle::Command;

const COMMAND_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Dispatch,
    IdleTick,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    at: Instant,
    kind: TimerKind,
}

/// The scheduler actor.
pub struct Scheduler<H, P> {
    config: SchedulerConfig,
    queue: ActionQueue,
    timer: Option<PendingTimer>,
    idle_remaining: Option<u32>,
    /// Early restart requested by a handler for the end of this cycle.
    restart_at: Option<Instant>,
    last_dispatch: Instant,
    /// Delay of the armed timer, used by the watchdog.
    expected: Duration,
    cycle: u64,
    started: bool,
    handler: H,
    planners: Vec<Box<dyn Planner>>,
    publisher: P,
}

impl<H, P> Scheduler<H, P>
where
    H: ActionHandler + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    /// Spawn the actor on the current runtime.
    ///
    /// Nothing is dispatched until [`SchedulerHandle::run`] is called.
    pub fn spawn(
        config: SchedulerConfig,
        handler: H,
        planners: Vec<Box<dyn Planner>>,
        publisher: P,
    ) -> (SchedulerHandle, JoinHandle<()>) {
        let (sender, commands) = mpsc::channel(COMMAND_CAPACITY);
        let scheduler = Self {
            config,
            queue: ActionQueue::new(),
            timer: None,
            idle_remaining: None,
            restart_at: None,
            last_dispatch: Instant::now(),
            expected: config.base_delay,
            cycle: 0,
            started: false,
            handler,
            planners,
            publisher,
        };
        let task = tokio::spawn(scheduler.run_loop(commands));
        (SchedulerHandle::new(sender), task)
    }

    async fn run_loop(mut self, mut commands: mpsc::Receiver<Command>) {
        let mut watchdog = tokio::time::interval(self.config.watchdog_interval);
        watchdog.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let deadline = self.timer.map(|timer| timer.at);
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.apply(command).await,
                },
                () = sleep_until(deadline) => self.fire(&mut watchdog).await,
                _ = watchdog.tick() => self.check_watchdog().await,
            }
        }

        self.timer = None;
        self.publish(SchedulerEvent::Stopped).await;
        tracing::info!("scheduler stopped");
    }

    async fn apply(&mut self, command: Command) {
        match command {
            Command::Run => self.run().await,
            Command::Skip => {
                self.idle_remaining = None;
                self.arm(TimerKind::Dispatch, Duration::ZERO);
            }
            Command::Repeat { delay } => {
                self.idle_remaining = None;
                self.queue.rewind();
                self.arm(TimerKind::Dispatch, delay.unwrap_or(self.config.base_delay));
            }
            Command::InsertNext { item, delay } => {
                tracing::debug!(action = %item.action(), "inserting next action");
                self.idle_remaining = None;
                self.queue.insert_next(item);
                self.arm(TimerKind::Dispatch, delay.unwrap_or(self.config.base_delay));
            }
            Command::Enqueue { item } => self.queue.enqueue(item),
            Command::EnqueueDeferred { item } => self.queue.enqueue_deferred(item),
            Command::Status { response } => {
                let _ = response.send(self.status());
            }
            // handled by the loop
            Command::Shutdown => {}
        }
    }

    /// Rebuild the queue from the planners and start dispatching.
    #[tracing::instrument(skip(self))]
    async fn run(&mut self) {
        self.timer = None;
        self.idle_remaining = None;
        self.restart_at = None;
        self.started = true;
        self.cycle += 1;

        let marker = ScheduledAction::with_delay(
            Action::StatusMarker { cycle: self.cycle },
            Duration::ZERO,
        );
        self.queue.reset_for_cycle(marker);
        for planner in &self.planners {
            let items = planner.plan();
            tracing::debug!(planner = planner.name(), count = items.len(), "planner enqueued actions");
            for item in items {
                self.queue.enqueue(item);
            }
        }

        let queued = self.queue.len();
        tracing::info!(queued, "cycle started");
        self.publish(SchedulerEvent::CycleStarted {
            cycle: self.cycle,
            queued,
        })
        .await;

        self.last_dispatch = Instant::now();
        self.arm(TimerKind::Dispatch, Duration::ZERO);
    }

    async fn fire(&mut self, watchdog: &mut Interval) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        match timer.kind {
            TimerKind::Dispatch => self.dispatch(watchdog).await,
            TimerKind::IdleTick => self.idle_tick().await,
        }
    }

    async fn dispatch(&mut self, watchdog: &mut Interval) {
        self.last_dispatch = Instant::now();
        let index = self.queue.cursor();
        let Some(item) = self.queue.take_next() else {
            self.start_idle().await;
            return;
        };

        let label = item.action().to_string();
        tracing::debug!(cycle = self.cycle, index, action = %label, "dispatching");
        self.publish(SchedulerEvent::Dispatched {
            cycle: self.cycle,
            index,
            action: label.clone(),
        })
        .await;

        // a running handler is due back right away
        self.expected = Duration::ZERO;
        let handled = {
            let handling = self.handler.handle(item.action());
            tokio::pin!(handling);
            loop {
                tokio::select! {
                    result = &mut handling => break Some(result),
                    _ = watchdog.tick() => if self.is_stalled() {
                        break None;
                    },
                }
            }
        };
        let outcome = match handled {
            Some(Ok(outcome)) => outcome,
            Some(Err(err)) => {
                let error = describe(&err);
                tracing::warn!(action = %label, %error, "action handler failed");
                self.publish(SchedulerEvent::HandlerFailed {
                    action: label,
                    error,
                })
                .await;
                HandlerOutcome::proceed()
            }
            None => {
                let elapsed = self.last_dispatch.elapsed();
                tracing::warn!(action = %label, ?elapsed, "action handler stalled, restarting cycle");
                self.watchdog_restart(elapsed).await;
                return;
            }
        };

        if let Some(delay) = outcome.next_cycle {
            self.restart_at = Some(Instant::now() + delay);
        }
        for follow_up in outcome.follow_ups {
            self.queue.enqueue(follow_up);
        }
        let base = self.config.base_delay;
        match outcome.continuation {
            Continuation::Proceed => self.arm(TimerKind::Dispatch, item.delay_or(base)),
            Continuation::Repeat(delay) => {
                self.queue.rewind();
                self.arm(TimerKind::Dispatch, delay.unwrap_or(base));
            }
            Continuation::InsertNext(next) => {
                self.queue.insert_next(next);
                self.arm(TimerKind::Dispatch, base);
            }
            Continuation::Skip => self.arm(TimerKind::Dispatch, Duration::ZERO),
        }
    }

    async fn start_idle(&mut self) {
        if let Some(at) = self.restart_at.take() {
            let delay = at.saturating_duration_since(Instant::now());
            tracing::debug!(?delay, "queue exhausted, next cycle requested");
            self.publish(SchedulerEvent::IdleStarted { ticks: 1 }).await;
            self.idle_remaining = Some(1);
            self.arm(TimerKind::IdleTick, delay);
            return;
        }
        let ticks = self.config.idle_ticks;
        tracing::debug!(ticks, "queue exhausted, idling");
        self.publish(SchedulerEvent::IdleStarted { ticks }).await;
        if ticks == 0 {
            self.run().await;
            return;
        }
        self.idle_remaining = Some(ticks);
        self.arm(TimerKind::IdleTick, self.config.idle_tick);
    }

    async fn idle_tick(&mut self) {
        // idle ticks count as heartbeats for the watchdog
        self.last_dispatch = Instant::now();
        let remaining = self.idle_remaining.unwrap_or(1).saturating_sub(1);
        self.publish(SchedulerEvent::IdleTick { remaining }).await;
        if remaining == 0 {
            self.run().await;
        } else {
            self.idle_remaining = Some(remaining);
            self.arm(TimerKind::IdleTick, self.config.idle_tick);
        }
    }

    fn is_stalled(&self) -> bool {
        self.started
            && watchdog::is_stalled(
                self.last_dispatch.elapsed(),
                self.expected,
                self.config.watchdog_slack,
            )
    }

    async fn check_watchdog(&mut self) {
        if self.is_stalled() {
            let elapsed = self.last_dispatch.elapsed();
            tracing::warn!(?elapsed, expected = ?self.expected, "dispatch chain stalled, restarting cycle");
            self.watchdog_restart(elapsed).await;
        }
    }

    async fn watchdog_restart(&mut self, elapsed: Duration) {
        self.publish(SchedulerEvent::WatchdogFired {
            elapsed_ms: millis(elapsed),
            expected_ms: millis(self.expected),
        })
        .await;
        self.run().await;
    }

    /// Replace the pending timer, if any.
    fn arm(&mut self, kind: TimerKind, delay: Duration) {
        self.timer = Some(PendingTimer {
            at: Instant::now() + delay,
            kind,
        });
        self.expected = delay;
    }

    fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            cursor: self.queue.cursor(),
            len: self.queue.len(),
            waiting: self.queue.waiting(),
            idle_remaining: self.idle_remaining,
            pending_timers: usize::from(self.timer.is_some()),
            cycle: self.cycle,
        }
    }

    async fn publish(&self, kind: SchedulerEvent) {
        if let Err(err) = self.publisher.publish(Event::new(kind)).await {
            tracing::warn!(%err, "failed to publish scheduler event");
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn describe(err: &MarshalError) -> String {
    match err.source() {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use tokio::sync::broadcast;

    use marshal_domain::command::GameCommand;
    use marshal_domain::error::{CommandError, MarshalError};

    use super::*;
    use crate::event_bus::InProcessEventBus;

    type Script = Box<dyn Fn(&Action) -> Option<Result<HandlerOutcome, MarshalError>> + Send + Sync>;

    /// Records every dispatched action with its virtual time; a script
    /// decides the outcome, `None` meaning the handler never returns.
    struct Scripted {
        seen: mpsc::UnboundedSender<(Action, Instant)>,
        script: Script,
    }

    impl ActionHandler for Scripted {
        fn handle(
            &self,
            action: &Action,
        ) -> impl Future<Output = Result<HandlerOutcome, MarshalError>> + Send {
            let _ = self.seen.send((action.clone(), Instant::now()));
            let result = (self.script)(action);
            async move {
                match result {
                    Some(result) => result,
                    None => std::future::pending().await,
                }
            }
        }
    }

    struct Fixed(Vec<ScheduledAction>);

    impl Planner for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn plan(&self) -> Vec<ScheduledAction> {
            self.0.clone()
        }
    }

    struct Harness {
        handle: SchedulerHandle,
        seen: mpsc::UnboundedReceiver<(Action, Instant)>,
        events: broadcast::Receiver<Event>,
    }

    fn config() -> SchedulerConfig {
        SchedulerConfig {
            base_delay: Duration::from_millis(1500),
            idle_ticks: 10,
            idle_tick: Duration::from_millis(1000),
            watchdog_interval: Duration::from_millis(1000),
            watchdog_slack: Duration::from_secs(30),
            evaluation_interval: Duration::from_secs(3),
        }
    }

    fn spawn(config: SchedulerConfig, planned: Vec<ScheduledAction>, script: Script) -> Harness {
        let (tx, seen) = mpsc::unbounded_channel();
        let bus = Arc::new(InProcessEventBus::new(256));
        let events = bus.subscribe();
        let handler = Scripted { seen: tx, script };
        let (handle, _task) = Scheduler::spawn(config, handler, vec![Box::new(Fixed(planned))], bus);
        Harness {
            handle,
            seen,
            events,
        }
    }

    fn proceed() -> Script {
        Box::new(|_| Some(Ok(HandlerOutcome::proceed())))
    }

    fn produce(item: &str) -> Action {
        Action::Submit {
            command: GameCommand::Produce {
                item: item.to_string(),
                amount: 1,
            },
        }
    }

    async fn next_event(events: &mut broadcast::Receiver<Event>, pred: impl Fn(&SchedulerEvent) -> bool) -> (SchedulerEvent, Instant) {
        loop {
            let event = events.recv().await.unwrap();
            if pred(&event.kind) {
                return (event.kind, Instant::now());
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_dispatch_with_own_or_base_delay_then_idle() {
        let planned = vec![
            ScheduledAction::new(produce("a")),
            ScheduledAction::with_delay(produce("b"), Duration::from_millis(2000)),
            ScheduledAction::new(produce("c")),
        ];
        let mut h = spawn(config(), planned, proceed());
        let start = Instant::now();

        h.handle.run().await.unwrap();

        let (marker, at) = h.seen.recv().await.unwrap();
        assert_eq!(marker, Action::StatusMarker { cycle: 1 });
        assert_eq!(at - start, Duration::ZERO);

        let mut times = Vec::new();
        for expected in [produce("a"), produce("b"), produce("c")] {
            let (action, at) = h.seen.recv().await.unwrap();
            assert_eq!(action, expected);
            times.push(at - start);
        }
        assert_eq!(
            times,
            vec![
                Duration::ZERO,
                Duration::from_millis(1500),
                Duration::from_millis(3500),
            ]
        );

        let (_, idle_at) = next_event(&mut h.events, |e| matches!(e, SchedulerEvent::IdleStarted { .. })).await;
        assert_eq!(idle_at - start, Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn should_restart_after_exactly_k_idle_ticks() {
        let mut h = spawn(config(), vec![], proceed());
        let start = Instant::now();

        h.handle.run().await.unwrap();

        let mut remaining = Vec::new();
        let restart_at = loop {
            let event = h.events.recv().await.unwrap();
            match event.kind {
                SchedulerEvent::IdleTick { remaining: r } => remaining.push(r),
                SchedulerEvent::CycleStarted { cycle: 2, .. } => break Instant::now(),
                _ => {}
            }
        };

        assert_eq!(remaining, (0..10).rev().collect::<Vec<u32>>());
        assert_eq!(restart_at - start, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn should_cancel_idle_countdown_when_inserting_next() {
        let mut h = spawn(config(), vec![], proceed());
        h.handle.run().await.unwrap();
        next_event(&mut h.events, |e| matches!(e, SchedulerEvent::IdleTick { remaining: 8 })).await;

        h.handle
            .insert_next(ScheduledAction::new(produce("urgent")), Some(Duration::from_millis(200)))
            .await
            .unwrap();
        let status = h.handle.status().await.unwrap();

        assert_eq!(status.pending_timers, 1);
        assert_eq!(status.idle_remaining, None);

        h.seen.recv().await.unwrap(); // status marker
        let (action, _) = h.seen.recv().await.unwrap();
        assert_eq!(action, produce("urgent"));
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_exactly_one_timer_after_repeated_inserts() {
        let planned = vec![ScheduledAction::with_delay(produce("slow"), Duration::from_secs(60))];
        let h = spawn(config(), planned, proceed());
        h.handle.run().await.unwrap();

        for item in ["x", "y", "z"] {
            h.handle
                .insert_next(ScheduledAction::new(produce(item)), None)
                .await
                .unwrap();
            assert_eq!(h.handle.status().await.unwrap().pending_timers, 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_dispatch_inserted_action_before_remaining_items() {
        let planned = vec![
            ScheduledAction::with_delay(produce("a"), Duration::from_secs(5)),
            ScheduledAction::new(produce("b")),
        ];
        let mut h = spawn(config(), planned, proceed());
        h.handle.run().await.unwrap();
        h.seen.recv().await.unwrap();
        h.seen.recv().await.unwrap();

        h.handle
            .insert_next(ScheduledAction::new(produce("inserted")), None)
            .await
            .unwrap();

        assert_eq!(h.seen.recv().await.unwrap().0, produce("inserted"));
        assert_eq!(h.seen.recv().await.unwrap().0, produce("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn should_continue_chain_when_handler_fails() {
        let planned = vec![ScheduledAction::new(produce("broken")), ScheduledAction::new(produce("next"))];
        let script: Script = Box::new(|action| {
            if *action == produce("broken") {
                Some(Err(CommandError {
                    action_code: "produce".to_string(),
                    reason: "no workshop".to_string(),
                }
                .into()))
            } else {
                Some(Ok(HandlerOutcome::proceed()))
            }
        });
        let mut h = spawn(config(), planned, script);

        h.handle.run().await.unwrap();

        let (failed, _) = next_event(&mut h.events, |e| matches!(e, SchedulerEvent::HandlerFailed { .. })).await;
        assert!(matches!(failed, SchedulerEvent::HandlerFailed { error, .. } if error.contains("no workshop")));
        h.seen.recv().await.unwrap();
        h.seen.recv().await.unwrap();
        assert_eq!(h.seen.recv().await.unwrap().0, produce("next"));
    }

    #[tokio::test(start_paused = true)]
    async fn should_redispatch_action_when_handler_asks_to_repeat() {
        let calls = Arc::new(Mutex::new(HashMap::<String, u32>::new()));
        let counter = Arc::clone(&calls);
        let script: Script = Box::new(move |action| {
            let mut calls = counter.lock().unwrap();
            let count = calls.entry(action.to_string()).or_insert(0);
            *count += 1;
            if *action == Action::EvaluatePlan && *count == 1 {
                Some(Ok(HandlerOutcome::repeat(Some(Duration::from_millis(700)))))
            } else {
                Some(Ok(HandlerOutcome::proceed()))
            }
        });
        let planned = vec![ScheduledAction::new(Action::EvaluatePlan), ScheduledAction::new(Action::Wait)];
        let mut h = spawn(config(), planned, script);

        h.handle.run().await.unwrap();

        h.seen.recv().await.unwrap();
        let (first, t1) = h.seen.recv().await.unwrap();
        let (second, t2) = h.seen.recv().await.unwrap();
        let (third, _) = h.seen.recv().await.unwrap();
        assert_eq!(first, Action::EvaluatePlan);
        assert_eq!(second, Action::EvaluatePlan);
        assert_eq!(t2 - t1, Duration::from_millis(700));
        assert_eq!(third, Action::Wait);
    }

    #[tokio::test(start_paused = true)]
    async fn should_append_follow_ups_to_current_cycle() {
        let script: Script = Box::new(|action| {
            let outcome = if *action == Action::EvaluatePlan {
                HandlerOutcome::proceed().then([ScheduledAction::submit(GameCommand::CollectAll)])
            } else {
                HandlerOutcome::proceed()
            };
            Some(Ok(outcome))
        });
        let mut h = spawn(config(), vec![ScheduledAction::new(Action::EvaluatePlan)], script);

        h.handle.run().await.unwrap();

        h.seen.recv().await.unwrap();
        h.seen.recv().await.unwrap();
        assert_eq!(
            h.seen.recv().await.unwrap().0,
            Action::Submit {
                command: GameCommand::CollectAll
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_restart_cycle_when_handler_stalls() {
        let mut cfg = config();
        cfg.watchdog_slack = Duration::from_secs(5);
        let script: Script = Box::new(|action| {
            if *action == Action::Wait {
                None
            } else {
                Some(Ok(HandlerOutcome::proceed()))
            }
        });
        let mut h = spawn(cfg, vec![ScheduledAction::new(Action::Wait)], script);
        let start = Instant::now();

        h.handle.run().await.unwrap();

        let (fired, at) = next_event(&mut h.events, |e| matches!(e, SchedulerEvent::WatchdogFired { .. })).await;
        // first watchdog tick past the 5s slack
        assert_eq!(at - start, Duration::from_secs(6));
        assert_eq!(
            fired,
            SchedulerEvent::WatchdogFired {
                elapsed_ms: 6000,
                expected_ms: 0
            }
        );
        let (restarted, _) = next_event(&mut h.events, |e| matches!(e, SchedulerEvent::CycleStarted { .. })).await;
        assert_eq!(restarted, SchedulerEvent::CycleStarted { cycle: 2, queued: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_watch_chain_before_first_run() {
        let mut cfg = config();
        cfg.watchdog_slack = Duration::from_secs(1);
        let mut h = spawn(cfg, vec![], proceed());

        tokio::time::sleep(Duration::from_secs(60)).await;
        let status = h.handle.status().await.unwrap();

        assert_eq!(status.cycle, 0);
        assert_eq!(status.pending_timers, 0);
        assert!(h.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_fire_watchdog_when_idle_tick_outlasts_slack() {
        let mut cfg = config();
        cfg.idle_ticks = 2;
        cfg.idle_tick = Duration::from_secs(20);
        cfg.watchdog_slack = Duration::from_secs(5);
        let mut h = spawn(cfg, vec![ScheduledAction::new(produce("a"))], proceed());

        h.handle.run().await.unwrap();

        let mut kinds = Vec::new();
        loop {
            let event = h.events.recv().await.unwrap();
            if matches!(event.kind, SchedulerEvent::CycleStarted { cycle: 3, .. }) {
                break;
            }
            kinds.push(event.kind.name());
        }
        assert!(!kinds.contains(&"watchdog_fired"));
        assert_eq!(kinds.iter().filter(|k| **k == "idle_tick").count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn should_restart_cycle_early_when_handler_requests_it() {
        let script: Script = Box::new(|action| {
            let outcome = HandlerOutcome::proceed();
            if *action == Action::EvaluatePlan {
                Some(Ok(outcome.next_cycle_in(Duration::from_secs(4))))
            } else {
                Some(Ok(outcome))
            }
        });
        let mut h = spawn(config(), vec![ScheduledAction::new(Action::EvaluatePlan)], script);
        let start = Instant::now();

        h.handle.run().await.unwrap();

        let (idle, _) = next_event(&mut h.events, |e| matches!(e, SchedulerEvent::IdleStarted { .. })).await;
        assert_eq!(idle, SchedulerEvent::IdleStarted { ticks: 1 });
        let (_, restart_at) = next_event(&mut h.events, |e| matches!(e, SchedulerEvent::CycleStarted { cycle: 2, .. })).await;
        assert_eq!(restart_at - start, Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn should_rebuild_same_queue_when_run_twice() {
        let planned = vec![
            ScheduledAction::with_delay(produce("a"), Duration::from_secs(60)),
            ScheduledAction::new(produce("b")),
        ];
        let h = spawn(config(), planned, proceed());

        h.handle.run().await.unwrap();
        let first = h.handle.status().await.unwrap();
        h.handle.run().await.unwrap();
        let second = h.handle.status().await.unwrap();

        assert_eq!(first.len, second.len);
        assert_eq!(second.cycle, 2);
        assert_eq!(second.pending_timers, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_merge_deferred_actions_only_on_next_run() {
        let h = spawn(config(), vec![ScheduledAction::with_delay(produce("a"), Duration::from_secs(60))], proceed());
        h.handle.run().await.unwrap();

        h.handle
            .enqueue_deferred(ScheduledAction::submit(GameCommand::ReturnHome))
            .await
            .unwrap();
        let before = h.handle.status().await.unwrap();
        h.handle.run().await.unwrap();
        let after = h.handle.status().await.unwrap();

        assert_eq!(before.waiting, 1);
        assert_eq!(before.len, 2);
        assert_eq!(after.waiting, 0);
        assert_eq!(after.len, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_unavailable_after_shutdown() {
        let mut h = spawn(config(), vec![], proceed());
        h.handle.shutdown().await.unwrap();
        next_event(&mut h.events, |e| matches!(e, SchedulerEvent::Stopped)).await;

        let result = h.handle.status().await;

        assert!(matches!(result, Err(MarshalError::Unavailable(_))));
    }
}
