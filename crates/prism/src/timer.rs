use derive_more::{Display, From, Into};
use std::time::Duration;

/// Handle of a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("#{_0}")]
pub struct TimerId(u64);

/// Delayed-callback primitive the controller runs its timeouts on.
///
/// The controller never hands over a closure: it keeps the returned id and
/// the host reports the elapsed timer back through [`Carousel::fire`].
///
/// [`Carousel::fire`]: crate::Carousel::fire
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId;
    /// Cancelling an unknown or already fired timer is a no-op.
    fn cancel(&mut self, timer: TimerId);
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    id: TimerId,
}

/// Virtual clock. Nothing fires until the owner pulls due timers out of it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    queue: Vec<Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Removes the earliest timer due at or before `deadline` and moves the clock to it.
    /// Timers due at the same instant come out in scheduling order.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TimerId> {
        let (pos, _) = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= deadline)
            .min_by_key(|(_, p)| (p.due, p.id))?;
        let fired = self.queue.remove(pos);
        self.now = self.now.max(fired.due);
        Some(fired.id)
    }

    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.queue.push(Pending {
            due: self.now + delay,
            id,
        });
        id
    }

    fn cancel(&mut self, timer: TimerId) {
        self.queue.retain(|p| p.id != timer);
    }
}
