//! Owner of the two motor activities.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::Result;
use crate::motor::Tick;

use super::activity::Activity;
#[cfg(feature = "std")]
use super::activity::run_until;

/// Runs the case activity and the disc activity independently.
///
/// There is no ordering between the two: on a threaded host each gets its own
/// thread; on a single executor the caller interleaves them with
/// [`poll`](Self::poll).
///
/// # Example
///
/// ```rust,ignore
/// let mut supervisor = MotionSupervisor::new(
///     PlainActivity::new(case_channel),
///     SyncedActivity::new(disc_channel, SyncController::new(sensor, &SYNC)),
/// );
/// supervisor.begin()?;
/// supervisor.run(&SHUTDOWN);
/// ```
pub struct MotionSupervisor<C, D>
where
    C: Activity,
    D: Activity,
{
    case: C,
    disc: D,
}

impl<C, D> MotionSupervisor<C, D>
where
    C: Activity,
    D: Activity,
{
    /// Take ownership of both activities.
    pub fn new(case: C, disc: D) -> Self {
        Self { case, disc }
    }

    /// Run the driver power-on sequence on both channels.
    pub fn begin(&mut self) -> Result<()> {
        self.case.begin()?;
        self.disc.begin()?;
        info!("supervisor: both drivers ready");
        Ok(())
    }

    /// One cycle of each activity, case first.
    pub fn poll(&mut self) -> (Result<Tick>, Result<Tick>) {
        (self.case.cycle(), self.disc.cycle())
    }

    /// Run both activities on the current thread, alternating cycles, until
    /// `shutdown` is set.
    pub fn run_interleaved(&mut self, shutdown: &AtomicBool) -> u64 {
        let mut rounds = 0u64;
        while !shutdown.load(Ordering::Acquire) {
            let (case, disc) = self.poll();
            if case.is_err() {
                warn!("case: cycle failed, idling");
                let _ = self.case.idle();
            }
            if disc.is_err() {
                warn!("disc: cycle failed, idling");
                let _ = self.disc.idle();
            }
            rounds = rounds.wrapping_add(1);
        }
        rounds
    }

    /// Case activity.
    pub fn case(&self) -> &C {
        &self.case
    }

    /// Case activity, mutably.
    pub fn case_mut(&mut self) -> &mut C {
        &mut self.case
    }

    /// Disc activity.
    pub fn disc(&self) -> &D {
        &self.disc
    }

    /// Disc activity, mutably.
    pub fn disc_mut(&mut self) -> &mut D {
        &mut self.disc
    }

    /// Give both activities back.
    pub fn release(self) -> (C, D) {
        (self.case, self.disc)
    }
}

#[cfg(feature = "std")]
impl<C, D> MotionSupervisor<C, D>
where
    C: Activity + Send,
    D: Activity + Send,
{
    /// Run each activity on its own thread until `shutdown` is set.
    ///
    /// Returns the cycle counts of the case and disc activities.
    pub fn run(&mut self, shutdown: &AtomicBool) -> (u64, u64) {
        let Self { case, disc } = self;
        std::thread::scope(|scope| {
            let case_thread = scope.spawn(|| run_until(case, shutdown));
            let disc_cycles = run_until(disc, shutdown);
            let case_cycles = case_thread
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (case_cycles, disc_cycles)
        })
    }
}
