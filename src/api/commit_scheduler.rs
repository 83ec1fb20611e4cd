use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::trace;

use crate::core::AttributeId;

/// Range waiting for its idle delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCommit {
    pub min: f64,
    pub max: f64,
    pub due: Instant,
}

/// Debounces drag-driven range updates, one pending commit per attribute.
///
/// Time is supplied by the caller, so hosts drive it from their own event
/// loop (and tests from fixed instants).
#[derive(Debug, Clone)]
pub struct CommitScheduler {
    delay: Duration,
    pending: IndexMap<AttributeId, PendingCommit>,
}

impl CommitScheduler {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }

    /// Replaces any pending commit of `attribute`; returns when it falls due.
    pub fn schedule(&mut self, attribute: AttributeId, min: f64, max: f64, now: Instant) -> Instant {
        let due = now + self.delay;
        self.pending.shift_remove(&attribute);
        self.pending.insert(attribute, PendingCommit { min, max, due });
        trace!(%attribute, min, max, "range commit scheduled");
        due
    }

    pub fn cancel(&mut self, attribute: AttributeId) -> bool {
        self.pending.shift_remove(&attribute).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn pending(&self, attribute: AttributeId) -> Option<PendingCommit> {
        self.pending.get(&attribute).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().map(|commit| commit.due).min()
    }

    /// Removes and returns every commit due at `now`, oldest schedule first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(AttributeId, PendingCommit)> {
        let due: Vec<(AttributeId, PendingCommit)> = self
            .pending
            .iter()
            .filter(|(_, commit)| commit.due <= now)
            .map(|(&attribute, &commit)| (attribute, commit))
            .collect();
        for (attribute, _) in &due {
            self.pending.shift_remove(attribute);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::CommitScheduler;
    use crate::core::AttributeId;

    #[test]
    fn later_schedule_replaces_pending_commit() {
        let start = Instant::now();
        let mut scheduler = CommitScheduler::new(Duration::from_millis(250));
        scheduler.schedule(AttributeId(0), 1.0, 2.0, start);
        scheduler.schedule(AttributeId(0), 3.0, 4.0, start + Duration::from_millis(100));

        assert!(scheduler.take_due(start + Duration::from_millis(300)).is_empty());
        let due = scheduler.take_due(start + Duration::from_millis(350));
        assert_eq!(due.len(), 1);
        assert_eq!((due[0].1.min, due[0].1.max), (3.0, 4.0));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancel_drops_pending_commit() {
        let start = Instant::now();
        let mut scheduler = CommitScheduler::new(Duration::from_millis(10));
        scheduler.schedule(AttributeId(1), 1.0, 2.0, start);
        assert!(scheduler.cancel(AttributeId(1)));
        assert!(!scheduler.cancel(AttributeId(1)));
        assert!(scheduler.next_due().is_none());
    }
}
