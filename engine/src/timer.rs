//! One-shot timers keyed by [`TickKind`].
//!
//! The scheduler never assumes a repeating timer: after every tick it calls
//! [`Timer::schedule_after`] again. [`TimerQueue`] is the deadline-based implementation
//! the host drives from its event loop; tests drive it with a virtual clock.

use std::time::{Duration, Instant};

use unveil_types::TickKind;

pub trait Timer {
    /// Arm the timer for `kind` to fire `delay` after the current instant.
    ///
    /// Each kind has a single slot; arming an armed kind replaces its deadline.
    fn schedule_after(&mut self, delay: Duration, kind: TickKind);

    /// Disarm `kind`. Cancelling an unarmed kind is a no-op.
    fn cancel(&mut self, kind: TickKind);
}

#[derive(Debug, Clone)]
pub struct TimerQueue {
    now: Instant,
    slots: [Option<Instant>; 2],
}

const fn slot(kind: TickKind) -> usize {
    match kind {
        TickKind::Jumble => 0,
        TickKind::Resolve => 1,
    }
}

impl TimerQueue {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            slots: [None; 2],
        }
    }

    /// The instant new timers are armed relative to.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Move the clock forward. The clock never runs backwards.
    pub fn advance_to(&mut self, now: Instant) {
        self.now = self.now.max(now);
    }

    #[must_use]
    pub fn deadline(&self, kind: TickKind) -> Option<Instant> {
        self.slots[slot(kind)]
    }

    #[must_use]
    pub fn is_armed(&self, kind: TickKind) -> bool {
        self.deadline(kind).is_some()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Earliest armed deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.iter().flatten().min().copied()
    }

    /// Pop the earliest timer due at or before `now`.
    ///
    /// The clock moves to that timer's deadline, not to `now`, so a handler that
    /// re-arms keeps a steady cadence even when the loop wakes late. Ties fire in
    /// [`TickKind::ALL`] order.
    pub fn pop_due(&mut self, now: Instant) -> Option<TickKind> {
        let (kind, deadline) = TickKind::ALL
            .into_iter()
            .filter_map(|kind| self.deadline(kind).map(|deadline| (kind, deadline)))
            .filter(|&(_, deadline)| deadline <= now)
            .min_by_key(|&(_, deadline)| deadline)?;
        self.slots[slot(kind)] = None;
        self.advance_to(deadline);
        Some(kind)
    }
}

impl Timer for TimerQueue {
    fn schedule_after(&mut self, delay: Duration, kind: TickKind) {
        self.slots[slot(kind)] = Some(self.now + delay);
    }

    fn cancel(&mut self, kind: TickKind) {
        self.slots[slot(kind)] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn nothing_due_before_deadline() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new(t0);
        queue.schedule_after(100 * MS, TickKind::Jumble);
        assert_eq!(queue.next_deadline(), Some(t0 + 100 * MS));
        assert_eq!(queue.pop_due(t0 + 99 * MS), None);
        assert_eq!(queue.pop_due(t0 + 100 * MS), Some(TickKind::Jumble));
        assert!(queue.is_idle());
    }

    #[test]
    fn earliest_deadline_fires_first() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new(t0);
        queue.schedule_after(500 * MS, TickKind::Resolve);
        queue.schedule_after(100 * MS, TickKind::Jumble);

        let late = t0 + 600 * MS;
        assert_eq!(queue.pop_due(late), Some(TickKind::Jumble));
        assert_eq!(queue.now(), t0 + 100 * MS);
        assert_eq!(queue.pop_due(late), Some(TickKind::Resolve));
        assert_eq!(queue.now(), t0 + 500 * MS);
        assert_eq!(queue.pop_due(late), None);
    }

    #[test]
    fn ties_fire_jumble_first() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new(t0);
        queue.schedule_after(MS, TickKind::Resolve);
        queue.schedule_after(MS, TickKind::Jumble);
        assert_eq!(queue.pop_due(t0 + MS), Some(TickKind::Jumble));
        assert_eq!(queue.pop_due(t0 + MS), Some(TickKind::Resolve));
    }

    #[test]
    fn rearm_is_relative_to_fired_deadline() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new(t0);
        queue.schedule_after(100 * MS, TickKind::Jumble);
        // The loop wakes 30ms late.
        assert_eq!(queue.pop_due(t0 + 130 * MS), Some(TickKind::Jumble));
        queue.schedule_after(100 * MS, TickKind::Jumble);
        assert_eq!(queue.deadline(TickKind::Jumble), Some(t0 + 200 * MS));
    }

    #[test]
    fn rearming_replaces_deadline_and_cancel_disarms() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new(t0);
        queue.schedule_after(2000 * MS, TickKind::Resolve);
        queue.schedule_after(10 * MS, TickKind::Resolve);
        assert_eq!(queue.deadline(TickKind::Resolve), Some(t0 + 10 * MS));

        queue.cancel(TickKind::Resolve);
        assert!(!queue.is_armed(TickKind::Resolve));
        assert_eq!(queue.next_deadline(), None);
        queue.cancel(TickKind::Jumble);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new(t0 + 50 * MS);
        queue.advance_to(t0);
        assert_eq!(queue.now(), t0 + 50 * MS);
    }
}
