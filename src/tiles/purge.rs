//! Deferred removal of exiting tiles.
//!
//! Removals are scheduled against a virtual clock supplied by the host. Each
//! task carries the generation it was scheduled under; [`PurgeScheduler::cancel_all`]
//! bumps the generation so anything still queued becomes inert.

use std::time::Duration;

use super::core::ParticipantId;

/// Default time exiting tiles stay on screen.
pub const DEFAULT_REMOVAL_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PurgeHandle {
    pub id: u64,
    pub generation: u64,
}

/// A purge whose delay has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledPurge {
    pub handle: PurgeHandle,
    pub due: Duration,
    pub keys: Vec<ParticipantId>,
}

#[derive(Debug, Default)]
pub struct PurgeScheduler {
    queue: Vec<ScheduledPurge>,
    next_id: u64,
    generation: u64,
}

impl PurgeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn schedule(&mut self, now: Duration, delay: Duration, keys: Vec<ParticipantId>) -> PurgeHandle {
        let handle = PurgeHandle {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        self.queue.push(ScheduledPurge {
            handle,
            due: now.saturating_add(delay),
            keys,
        });
        handle
    }

    /// Remove and return every task due at `now`, oldest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<ScheduledPurge> {
        let generation = self.generation;
        let (mut due, rest): (Vec<_>, Vec<_>) = self
            .queue
            .drain(..)
            .filter(|task| task.handle.generation == generation)
            .partition(|task| task.due <= now);
        self.queue = rest;
        due.sort_by_key(|task| (task.due, task.handle.id));
        due
    }

    pub fn is_current(&self, handle: PurgeHandle) -> bool {
        handle.generation == self.generation
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn tasks_fire_once_delay_elapses() {
        let mut scheduler = PurgeScheduler::new();
        scheduler.schedule(ms(0), DEFAULT_REMOVAL_DELAY, vec!["a".into()]);

        assert!(scheduler.take_due(ms(249)).is_empty());
        let due = scheduler.take_due(ms(250));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].keys, vec![ParticipantId::from("a")]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn due_tasks_come_back_in_order() {
        let mut scheduler = PurgeScheduler::new();
        let late = scheduler.schedule(ms(100), ms(250), vec!["b".into()]);
        let early = scheduler.schedule(ms(0), ms(250), vec!["a".into()]);

        let due = scheduler.take_due(ms(400));
        let handles: Vec<_> = due.iter().map(|task| task.handle).collect();
        assert_eq!(handles, vec![early, late]);
    }

    #[test]
    fn cancel_all_invalidates_outstanding_handles() {
        let mut scheduler = PurgeScheduler::new();
        let handle = scheduler.schedule(ms(0), ms(250), vec!["a".into()]);
        scheduler.cancel_all();

        assert!(!scheduler.is_current(handle));
        assert!(scheduler.take_due(ms(1_000)).is_empty());
    }

    #[test]
    fn far_future_due_time_saturates() {
        let mut scheduler = PurgeScheduler::new();
        scheduler.schedule(Duration::MAX, ms(250), vec!["a".into()]);

        let due = scheduler.take_due(Duration::MAX);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].due, Duration::MAX);
    }
}
