//! Test helpers shared by the activity and supervisor tests.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::MotorId;
use crate::error::Result;
use crate::motor::Tick;

use super::activity::Activity;

/// Flips the shutdown flag after a fixed number of cycles.
pub(crate) struct Countdown<'s, A> {
    pub(crate) inner: A,
    left: u32,
    shutdown: &'s AtomicBool,
}

impl<'s, A> Countdown<'s, A> {
    pub(crate) fn new(inner: A, cycles: u32, shutdown: &'s AtomicBool) -> Self {
        Self {
            inner,
            left: cycles,
            shutdown,
        }
    }
}

impl<A: Activity> Activity for Countdown<'_, A> {
    fn id(&self) -> MotorId {
        self.inner.id()
    }

    fn begin(&mut self) -> Result<()> {
        self.inner.begin()
    }

    fn cycle(&mut self) -> Result<Tick> {
        self.left = self.left.saturating_sub(1);
        if self.left == 0 {
            self.shutdown.store(true, Ordering::Release);
        }
        self.inner.cycle()
    }

    fn idle(&mut self) -> Result<Tick> {
        self.inner.idle()
    }
}
