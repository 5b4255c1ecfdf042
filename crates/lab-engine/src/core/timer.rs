/// Monotonic counter identifying one attempt of a sequenced interaction
/// (one spin, one wizard visit). Timers capture the epoch they were scheduled
/// under; consumers drop any that fire after the epoch has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(pub u64);

impl Epoch {
    /// Advance to the next epoch and return it.
    pub fn bump(&mut self) -> Epoch {
        self.0 += 1;
        *self
    }

    pub fn is_current(&self, other: Epoch) -> bool {
        self.0 == other.0
    }
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub epoch: Epoch,
    pub payload: T,
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    /// Seconds left; due once this reaches zero.
    remaining: f32,
    seq: u64,
    epoch: Epoch,
    payload: T,
}

/// One-shot timers advanced by the frame clock.
///
/// Nothing sleeps: `advance` counts every entry down, `pop_due` hands back
/// expired entries in due order (insertion order for equal due times).
/// Entries scheduled while draining with a zero delay fire in the same drain.
/// Each entry keeps its own countdown, so precision does not degrade with
/// session length.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<Scheduled<T>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fire `delay` seconds from now under `epoch`.
    pub fn schedule(&mut self, delay: f32, epoch: Epoch, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled {
            remaining: delay.max(0.0),
            seq,
            epoch,
            payload,
        });
    }

    /// Move the clock forward.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for entry in &mut self.entries {
            entry.remaining -= dt;
        }
    }

    /// Remove and return the earliest expired timer, if any.
    pub fn pop_due(&mut self) -> Option<Fired<T>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.remaining <= 0.0)
            .min_by(|(_, a), (_, b)| a.remaining.total_cmp(&b.remaining).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(idx);
        Some(Fired {
            epoch: entry.epoch,
            payload: entry.payload,
        })
    }

    /// Drop every timer scheduled under an epoch other than `current`.
    pub fn retain_epoch(&mut self, current: Epoch) {
        self.entries.retain(|e| current.is_current(e.epoch));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_delay() {
        let mut q = TimerQueue::new();
        q.schedule(1.0, Epoch(1), "a");
        q.advance(0.5);
        assert!(q.pop_due().is_none());
        q.advance(0.5);
        assert_eq!(q.pop_due().map(|f| f.payload), Some("a"));
        assert!(q.is_empty());
    }

    #[test]
    fn due_order_then_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(0.6, Epoch(1), 3);
        q.schedule(0.3, Epoch(1), 1);
        q.schedule(0.3, Epoch(1), 2);
        q.advance(1.0);
        let order: Vec<i32> = std::iter::from_fn(|| q.pop_due().map(|f| f.payload)).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn zero_delay_scheduled_while_draining_fires_same_drain() {
        let mut q = TimerQueue::new();
        q.schedule(1.0, Epoch(1), 0);
        q.advance(1.0);
        let first = q.pop_due().unwrap();
        q.schedule(0.0, first.epoch, 1);
        assert_eq!(q.pop_due().map(|f| f.payload), Some(1));
    }

    #[test]
    fn fired_timer_carries_its_epoch() {
        let mut epoch = Epoch::default();
        let mut q = TimerQueue::new();
        let scheduled_under = epoch.bump();
        q.schedule(0.1, scheduled_under, ());
        epoch.bump();
        q.advance(0.2);
        let fired = q.pop_due().unwrap();
        assert!(!epoch.is_current(fired.epoch));
    }

    #[test]
    fn late_timers_keep_frame_precision() {
        let mut q = TimerQueue::new();
        q.advance(262_144.0);
        q.schedule(1.0, Epoch(1), "late");
        let mut frames = 0;
        while q.pop_due().is_none() {
            q.advance(1.0 / 60.0);
            frames += 1;
            assert!(frames <= 61, "still pending after {} frames", frames);
        }
        assert!(frames >= 59, "fired after only {} frames", frames);
    }

    #[test]
    fn retain_epoch_drops_stale() {
        let mut q = TimerQueue::new();
        q.schedule(0.1, Epoch(1), "old");
        q.schedule(0.1, Epoch(2), "new");
        q.retain_epoch(Epoch(2));
        assert_eq!(q.len(), 1);
    }
}
