use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    deadline: Duration,
}

/// One-shot timers on the session clock. Nothing fires by itself: expired timers are
/// collected by [`TimerQueue::poll`] from the event loop.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Duration, after: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        self.pending.push(PendingTimer {
            handle,
            deadline: now + after,
        });

        handle
    }

    /// Returns false if the timer had already fired or been cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        self.pending.len() != before
    }

    /// Removes and returns every timer whose deadline is at or before `now`, earliest first.
    pub fn poll(&mut self, now: Duration) -> Vec<TimerHandle> {
        let (mut expired, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|timer| timer.deadline <= now);
        self.pending = pending;

        expired.sort_by_key(|timer| (timer.deadline, timer.handle));
        expired.into_iter().map(|timer| timer.handle).collect()
    }

    #[allow(dead_code)]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn timers_fire_once_at_deadline_in_order() {
        let mut timers = TimerQueue::new();
        let late = timers.arm(ms(0), ms(300));
        let early = timers.arm(ms(100), ms(100));

        assert!(timers.poll(ms(199)).is_empty());
        assert_eq!(timers.poll(ms(300)), vec![early, late]);
        assert!(timers.poll(ms(10_000)).is_empty());
        assert_eq!(timers.len(), 0);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let handle = timers.arm(ms(0), ms(20_000));

        assert!(timers.is_pending(handle));
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(timers.poll(ms(20_000)).is_empty());
    }

    #[test]
    fn handles_are_unique() {
        let mut timers = TimerQueue::new();
        let first = timers.arm(ms(0), ms(10));
        timers.poll(ms(10));
        let second = timers.arm(ms(10), ms(10));

        assert_ne!(first, second);
    }
}
