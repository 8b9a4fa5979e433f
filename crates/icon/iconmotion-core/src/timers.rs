//! Timers used for delayed replays.
//!
//! Triggers never hold a timer handle from the host directly: every timer is
//! allocated through a [`TimerLedger`] so the host wiring can cancel whatever
//! is still pending when the trigger goes away. A fired id that is no longer
//! in the ledger is dropped.

use std::cell::RefCell;

use crate::ids::{IdAllocator, TimerId};

/// Host timer service (e.g. `setTimeout`). Fired ids are reported back
/// through `IconElement::fire_timer`.
pub trait Scheduler {
    fn schedule(&self, id: TimerId, delay_ms: u32);
    fn cancel(&self, id: TimerId);
}

#[derive(Debug, Default)]
pub struct TimerLedger {
    ids: IdAllocator,
    active: Vec<TimerId>,
}

impl TimerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, scheduler: &dyn Scheduler, delay_ms: u32) -> TimerId {
        let id = self.ids.alloc_timer();
        self.active.push(id);
        scheduler.schedule(id, delay_ms);
        id
    }

    pub fn cancel(&mut self, scheduler: &dyn Scheduler, id: TimerId) {
        if self.forget(id) {
            scheduler.cancel(id);
        }
    }

    /// Accept a fired timer. False if it was cancelled or never issued here.
    pub fn fire(&mut self, id: TimerId) -> bool {
        self.forget(id)
    }

    fn forget(&mut self, id: TimerId) -> bool {
        let before = self.active.len();
        self.active.retain(|t| *t != id);
        before != self.active.len()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.active.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Cancel everything still pending. Returns how many were cancelled.
    pub fn clear_all(&mut self, scheduler: &dyn Scheduler) -> usize {
        let pending = std::mem::take(&mut self.active);
        for id in &pending {
            scheduler.cancel(*id);
        }
        pending.len()
    }
}

#[derive(Debug, Default)]
struct Clock {
    now: u64,
    seq: u64,
    /// (due, seq, id); seq keeps insertion order among equal due times.
    pending: Vec<(u64, u64, TimerId)>,
}

/// Virtual-clock scheduler for headless hosts and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    clock: RefCell<Clock>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.clock.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.clock.borrow().pending.iter().any(|(_, _, t)| *t == id)
    }

    /// Move the clock forward and return the timers that came due, earliest
    /// first.
    pub fn advance(&self, ms: u64) -> Vec<TimerId> {
        let mut clock = self.clock.borrow_mut();
        clock.now = clock.now.saturating_add(ms);
        let now = clock.now;
        let mut due: Vec<(u64, u64, TimerId)> = Vec::new();
        clock.pending.retain(|entry| {
            if entry.0 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, id)| id).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, id: TimerId, delay_ms: u32) {
        let mut clock = self.clock.borrow_mut();
        let due = clock.now + u64::from(delay_ms);
        let seq = clock.seq;
        clock.seq += 1;
        clock.pending.push((due, seq, id));
    }

    fn cancel(&self, id: TimerId) {
        self.clock.borrow_mut().pending.retain(|(_, _, t)| *t != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_orders_by_due_time() {
        let sched = ManualScheduler::new();
        let mut ledger = TimerLedger::new();
        let slow = ledger.start(&sched, 300);
        let fast = ledger.start(&sched, 100);
        assert!(sched.advance(50).is_empty());
        assert_eq!(sched.advance(500), vec![fast, slow]);
        assert!(ledger.fire(fast));
        assert!(!ledger.fire(fast));
    }

    #[test]
    fn cancelled_timers_never_come_due() {
        let sched = ManualScheduler::new();
        let mut ledger = TimerLedger::new();
        let a = ledger.start(&sched, 10);
        let b = ledger.start(&sched, 10);
        ledger.cancel(&sched, a);
        assert!(!sched.is_scheduled(a));
        assert_eq!(ledger.clear_all(&sched), 1);
        assert!(!sched.is_scheduled(b));
        assert!(sched.advance(100).is_empty());
        assert!(ledger.is_empty());
    }
}
