//! The action queue: items, cursor and the waiting buffer.
//!
//! Pure bookkeeping with no timers; the scheduler actor owns exactly one
//! queue and drives it.

use marshal_domain::action::ScheduledAction;

#[derive(Debug, Default)]
pub struct ActionQueue {
    items: Vec<ScheduledAction>,
    waiting: Vec<ScheduledAction>,
    /// Index of the next action to dispatch.
    cursor: usize,
}

impl ActionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the current cycle.
    pub fn enqueue(&mut self, item: ScheduledAction) {
        self.items.push(item);
    }

    /// Hold back until the next cycle starts.
    pub fn enqueue_deferred(&mut self, item: ScheduledAction) {
        self.waiting.push(item);
    }

    /// Start a new cycle: clear the items, put `marker` first and merge the
    /// waiting buffer behind it.
    pub fn reset_for_cycle(&mut self, marker: ScheduledAction) {
        self.items.clear();
        self.cursor = 0;
        self.items.push(marker);
        self.items.append(&mut self.waiting);
    }

    /// The action under the cursor; advances the cursor past it.
    pub fn take_next(&mut self) -> Option<ScheduledAction> {
        let item = self.items.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(item)
    }

    /// Splice `item` so that it is the next action dispatched.
    pub fn insert_next(&mut self, item: ScheduledAction) {
        self.items.insert(self.cursor, item);
    }

    /// Step back over the last dispatched action so it runs again.
    pub fn rewind(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &ScheduledAction> {
        self.items.iter()
    }
}
