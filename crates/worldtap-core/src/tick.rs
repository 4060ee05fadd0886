//! Process-wide tick counter.
//!
//! The counter starts at zero when the process starts and is incremented
//! by the engine thread exactly once per completed tick. It is a single
//! atomic word, so reading it from any thread never tears.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic count of completed simulation ticks.
#[derive(Debug, Default)]
pub struct TickCounter {
    ticks: AtomicU64,
}

impl TickCounter {
    /// A counter at zero.
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
        }
    }

    /// Record one completed tick. Returns the new count.
    ///
    /// Saturates at `u64::MAX` rather than wrapping, so the value never
    /// decreases.
    pub fn increment(&self) -> u64 {
        let previous = self
            .ticks
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_add(1))
            })
            .unwrap_or_else(|n| n);
        previous.saturating_add(1)
    }

    /// Current count.
    pub fn get(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(TickCounter::new().get(), 0);
    }

    #[test]
    fn increments_by_one() {
        let counter = TickCounter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn readers_never_see_a_decrease() {
        let counter = Arc::new(TickCounter::new());
        let writer = {
            let counter = Arc::clone(&counter);
            std::thread::spawn(move || {
                for _ in 0..10_000 {
                    counter.increment();
                }
            })
        };

        let mut last = 0;
        while last < 10_000 {
            let now = counter.get();
            assert!(now >= last, "counter went from {last} to {now}");
            last = now;
        }
        assert!(writer.join().is_ok());
    }
}
