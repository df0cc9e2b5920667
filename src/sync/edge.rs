//! Rising edge detection on the position sensor.

use core::sync::atomic::{AtomicBool, Ordering};

/// Result of sampling the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeEvent {
    /// A debounced LOW -> HIGH transition.
    RisingEdge,
    /// Nothing to report.
    NoEvent,
}

/// Debounced LOW -> HIGH detector.
///
/// After an edge is reported, samples are ignored until the debounce window
/// has elapsed, and `previous_level` stays HIGH for that whole window, so a
/// bounce cannot produce a second event for the same transition.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    previous_level: bool,
    debounce_us: u32,
    /// Samples before this instant are ignored.
    deadline_us: Option<u64>,
}

impl EdgeDetector {
    /// Create a detector with a debounce window in microseconds.
    pub const fn new(debounce_us: u32) -> Self {
        Self {
            previous_level: false,
            debounce_us,
            deadline_us: None,
        }
    }

    /// Feed one sample taken at `now_us` on the activity's time base.
    pub fn poll(&mut self, level: bool, now_us: u64) -> EdgeEvent {
        if let Some(deadline) = self.deadline_us {
            if now_us < deadline {
                return EdgeEvent::NoEvent;
            }
            self.deadline_us = None;
        }

        let rising = level && !self.previous_level;
        self.previous_level = level;
        if rising {
            self.deadline_us = Some(now_us.saturating_add(self.debounce_us as u64));
            EdgeEvent::RisingEdge
        } else {
            EdgeEvent::NoEvent
        }
    }

    /// Forget the previous level and any pending debounce window.
    pub fn reset(&mut self) {
        self.previous_level = false;
        self.deadline_us = None;
    }

    /// Change the debounce window. Takes effect from the next edge.
    pub fn set_debounce_us(&mut self, debounce_us: u32) {
        self.debounce_us = debounce_us;
    }

    /// Last level taken into account.
    #[inline]
    pub fn previous_level(&self) -> bool {
        self.previous_level
    }

    /// Whether a debounce window is currently open.
    #[inline]
    pub fn is_debouncing(&self) -> bool {
        self.deadline_us.is_some()
    }
}

/// Edge flag set from an interrupt handler.
///
/// The interrupt side only calls [`signal`](Self::signal); the stepping
/// activity only calls [`take`](Self::take). Needs native atomic swap, or a
/// `critical-section`/`portable-atomic` backed target.
#[derive(Debug, Default)]
pub struct EdgeLatch {
    flag: AtomicBool,
}

impl EdgeLatch {
    /// Cleared latch, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Record an edge. Interrupt side.
    pub fn signal(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Read and clear. Activity side.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    /// Peek without clearing.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WINDOW: u32 = 10_000;

    #[test]
    fn test_single_edge() {
        let mut det = EdgeDetector::new(WINDOW);
        assert_eq!(det.poll(false, 0), EdgeEvent::NoEvent);
        assert_eq!(det.poll(true, 1_000), EdgeEvent::RisingEdge);
        assert_eq!(det.poll(true, 20_000), EdgeEvent::NoEvent);
    }

    #[test]
    fn test_high_at_startup_counts_as_edge() {
        let mut det = EdgeDetector::new(WINDOW);
        assert_eq!(det.poll(true, 0), EdgeEvent::RisingEdge);
    }

    #[test]
    fn test_bounce_inside_window_suppressed() {
        let mut det = EdgeDetector::new(WINDOW);
        assert_eq!(det.poll(true, 0), EdgeEvent::RisingEdge);
        assert_eq!(det.poll(false, 2_000), EdgeEvent::NoEvent);
        assert_eq!(det.poll(true, 4_000), EdgeEvent::NoEvent);
        assert!(det.previous_level());
        // Still high once the window closes: same transition, no event.
        assert_eq!(det.poll(true, 12_000), EdgeEvent::NoEvent);
    }

    #[test]
    fn test_new_transition_after_window() {
        let mut det = EdgeDetector::new(WINDOW);
        det.poll(true, 0);
        assert_eq!(det.poll(false, 15_000), EdgeEvent::NoEvent);
        assert_eq!(det.poll(true, 16_000), EdgeEvent::RisingEdge);
    }

    #[test]
    fn test_reset_rearms() {
        let mut det = EdgeDetector::new(WINDOW);
        det.poll(true, 0);
        det.reset();
        assert!(!det.is_debouncing());
        assert_eq!(det.poll(true, 1), EdgeEvent::RisingEdge);
    }

    #[test]
    fn test_latch_take_clears() {
        let latch = EdgeLatch::new();
        assert!(!latch.take());
        latch.signal();
        latch.signal();
        assert!(latch.is_set());
        assert!(latch.take());
        assert!(!latch.take());
    }

    proptest! {
        #[test]
        fn prop_events_are_at_least_one_window_apart(
            samples in proptest::collection::vec(any::<bool>(), 1..400),
            period in 1u64..5_000,
        ) {
            let mut det = EdgeDetector::new(WINDOW);
            let mut last: Option<u64> = None;
            for (i, level) in samples.into_iter().enumerate() {
                let now = i as u64 * period;
                if det.poll(level, now) == EdgeEvent::RisingEdge {
                    if let Some(prev) = last {
                        prop_assert!(now - prev >= WINDOW as u64);
                    }
                    last = Some(now);
                }
            }
        }

        #[test]
        fn prop_steady_level_never_repeats(high_for in 1usize..200) {
            let mut det = EdgeDetector::new(WINDOW);
            let events = (0..high_for)
                .filter(|&i| det.poll(true, i as u64 * 100) == EdgeEvent::RisingEdge)
                .count();
            prop_assert_eq!(events, 1);
        }
    }
}
