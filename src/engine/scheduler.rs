/*
Cooperative Timers
==================

The loop keeps itself going by arming a timer that rebuilds the next
iteration shortly before the current one ends. Timers here are plain data:
nothing fires on its own. The owner calls `take_due(now)` from its poll and
runs each due task to completion before looking at the next, so two
iteration builds can never interleave.

Every task carries the generation it was armed in. Stopping or switching
modes bumps the generation (and cancels the timer), so even a timer that
slipped through cancellation is recognised as stale and ignored.

  schedule(1.95, Reschedule{gen 3})     ──▶ queue: [1.95]
  stop()  → cancel(id), gen = 4         ──▶ queue: []
  take_due(2.0)                         ──▶ None
*/

use crate::modes::ModeName;

/// Handle for cancelling a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Build and queue the loop's next iteration
    Reschedule { generation: u64, mode: ModeName },
    /// The preview has played out
    PreviewEnd { generation: u64 },
}

#[derive(Debug)]
struct Timer {
    id: TimerId,
    due: f64,
    task: TimerTask,
}

/// Timer queue ordered by due time, ties broken by arming order.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: f64, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let index = self.timers.partition_point(|timer| timer.due <= due);
        self.timers.insert(index, Timer { id, due, task });
        id
    }

    /// Remove a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.iter().position(|timer| timer.id == id) {
            Some(index) => {
                self.timers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Pop the earliest timer if it is due at `now`.
    pub fn take_due(&mut self, now: f64) -> Option<(TimerId, TimerTask)> {
        match self.timers.first() {
            Some(timer) if timer.due <= now => {
                let timer = self.timers.remove(0);
                Some((timer.id, timer.task))
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reschedule(generation: u64) -> TimerTask {
        TimerTask::Reschedule {
            generation,
            mode: ModeName::Tube,
        }
    }

    #[test]
    fn fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2.0, reschedule(2));
        scheduler.schedule(1.0, reschedule(1));
        scheduler.schedule(2.0, TimerTask::PreviewEnd { generation: 3 });

        assert!(scheduler.take_due(0.5).is_none());
        assert_eq!(scheduler.take_due(5.0).map(|(_, t)| t), Some(reschedule(1)));
        assert_eq!(scheduler.take_due(5.0).map(|(_, t)| t), Some(reschedule(2)));
        assert_eq!(
            scheduler.take_due(5.0).map(|(_, t)| t),
            Some(TimerTask::PreviewEnd { generation: 3 })
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(1.0, reschedule(1));

        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.take_due(10.0).is_none());
    }

    #[test]
    fn ids_are_unique() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(1.0, reschedule(1));
        let b = scheduler.schedule(1.0, reschedule(1));

        assert_ne!(a, b);
        assert_eq!(scheduler.len(), 2);
    }
}
