use crate::timer::TimerId;

/// Coalesces a burst of navigation requests in one direction into a single delta.
///
/// Every trigger re-arms the debouncer with a fresh timer; only the most recent
/// timer resolves the burst.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: u32,
    timer: Option<TimerId>,
}

impl Debouncer {
    /// Counts one more request and arms `timer`, returning the timer it preempts.
    pub fn on_trigger(&mut self, timer: TimerId) -> Option<TimerId> {
        self.pending += 1;
        self.timer.replace(timer)
    }

    /// Resolves the burst when `timer` is the armed one.
    pub fn on_fire(&mut self, timer: TimerId) -> Option<u32> {
        if self.timer != Some(timer) {
            return None;
        }
        self.timer = None;
        Some(std::mem::take(&mut self.pending))
    }

    /// Drops the burst, returning the timer that still has to be cancelled.
    pub fn on_cancel(&mut self) -> Option<TimerId> {
        self.pending = 0;
        self.timer.take()
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_accumulates() {
        let mut debouncer = Debouncer::default();
        assert_eq!(debouncer.on_trigger(TimerId::from(1)), None);
        assert_eq!(debouncer.on_trigger(TimerId::from(2)), Some(TimerId::from(1)));
        assert_eq!(debouncer.on_trigger(TimerId::from(3)), Some(TimerId::from(2)));
        assert_eq!(debouncer.pending(), 3);

        // preempted timers no longer resolve anything
        assert_eq!(debouncer.on_fire(TimerId::from(2)), None);
        assert_eq!(debouncer.on_fire(TimerId::from(3)), Some(3));
        assert_eq!(debouncer.pending(), 0);
        assert_eq!(debouncer.on_cancel(), None);
    }

    #[test]
    fn test_new_burst_after_fire() {
        let mut debouncer = Debouncer::default();
        debouncer.on_trigger(TimerId::from(1));
        debouncer.on_fire(TimerId::from(1));

        assert_eq!(debouncer.on_trigger(TimerId::from(2)), None);
        assert_eq!(debouncer.on_fire(TimerId::from(2)), Some(1));
    }

    #[test]
    fn test_cancel_resets() {
        let mut debouncer = Debouncer::default();
        debouncer.on_trigger(TimerId::from(7));
        debouncer.on_trigger(TimerId::from(8));

        assert_eq!(debouncer.on_cancel(), Some(TimerId::from(8)));
        assert_eq!(debouncer.pending(), 0);
        assert_eq!(debouncer.on_fire(TimerId::from(8)), None);
        assert_eq!(debouncer.on_cancel(), None);
    }
}
