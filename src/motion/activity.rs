//! Per-motor activities and the loop that runs them.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::MotorId;
use crate::error::Result;
use crate::motor::{MotorChannel, Tick};
use crate::sync::{SyncController, SyncStatus};

/// One continuously scheduled unit driving one motor channel.
///
/// Each call to [`cycle`](Activity::cycle) runs exactly one step cycle or
/// one idle slice; the only suspension is inside it.
pub trait Activity {
    /// Motor driven by this activity.
    fn id(&self) -> MotorId;

    /// Power-on sequence for the driver.
    fn begin(&mut self) -> Result<()>;

    /// One iteration of the loop.
    fn cycle(&mut self) -> Result<Tick>;

    /// Sleep one idle slice without pulsing.
    fn idle(&mut self) -> Result<Tick>;
}

/// A channel that steps at its configured cadence and nothing else.
pub struct PlainActivity<'a, STEP, PIN, DELAY>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    channel: MotorChannel<'a, STEP, PIN, DELAY>,
}

impl<'a, STEP, PIN, DELAY> PlainActivity<'a, STEP, PIN, DELAY>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    /// Wrap a channel.
    pub fn new(channel: MotorChannel<'a, STEP, PIN, DELAY>) -> Self {
        Self { channel }
    }

    /// The driven channel.
    pub fn channel(&self) -> &MotorChannel<'a, STEP, PIN, DELAY> {
        &self.channel
    }

    /// The driven channel, mutably.
    pub fn channel_mut(&mut self) -> &mut MotorChannel<'a, STEP, PIN, DELAY> {
        &mut self.channel
    }

    /// Unwrap the channel.
    pub fn into_inner(self) -> MotorChannel<'a, STEP, PIN, DELAY> {
        self.channel
    }
}

impl<STEP, PIN, DELAY> Activity for PlainActivity<'_, STEP, PIN, DELAY>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    fn id(&self) -> MotorId {
        self.channel.id()
    }

    fn begin(&mut self) -> Result<()> {
        self.channel.begin()
    }

    fn cycle(&mut self) -> Result<Tick> {
        self.channel.refresh()?;
        self.channel.tick()
    }

    fn idle(&mut self) -> Result<Tick> {
        self.channel.idle()
    }
}

/// A channel whose cadence is driven by a [`SyncController`].
pub struct SyncedActivity<'a, STEP, PIN, DELAY, S>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
    S: InputPin,
{
    channel: MotorChannel<'a, STEP, PIN, DELAY>,
    sync: SyncController<'a, S>,
}

impl<'a, STEP, PIN, DELAY, S> SyncedActivity<'a, STEP, PIN, DELAY, S>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
    S: InputPin,
{
    /// Bind a controller to a channel.
    pub fn new(channel: MotorChannel<'a, STEP, PIN, DELAY>, sync: SyncController<'a, S>) -> Self {
        if !channel.is_linked_to_sensor() {
            warn!("{}: sync controller bound to a plain channel", channel.id().as_str());
        }
        Self { channel, sync }
    }

    /// The driven channel.
    pub fn channel(&self) -> &MotorChannel<'a, STEP, PIN, DELAY> {
        &self.channel
    }

    /// The driven channel, mutably.
    pub fn channel_mut(&mut self) -> &mut MotorChannel<'a, STEP, PIN, DELAY> {
        &mut self.channel
    }

    /// The controller.
    pub fn controller(&self) -> &SyncController<'a, S> {
        &self.sync
    }

    /// Controller status.
    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    /// Unwrap channel and controller.
    pub fn into_inner(self) -> (MotorChannel<'a, STEP, PIN, DELAY>, SyncController<'a, S>) {
        (self.channel, self.sync)
    }
}

impl<STEP, PIN, DELAY, S> Activity for SyncedActivity<'_, STEP, PIN, DELAY, S>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
    S: InputPin,
{
    fn id(&self) -> MotorId {
        self.channel.id()
    }

    fn begin(&mut self) -> Result<()> {
        self.channel.begin()?;
        self.sync.reset();
        Ok(())
    }

    fn cycle(&mut self) -> Result<Tick> {
        self.sync.cycle(&mut self.channel)
    }

    fn idle(&mut self) -> Result<Tick> {
        self.channel.idle()
    }
}

/// Run `activity` until `shutdown` is set. Returns the number of cycles.
///
/// A failed cycle is logged and replaced by an idle slice; the loop never
/// exits on its own.
pub fn run_until<A>(activity: &mut A, shutdown: &AtomicBool) -> u64
where
    A: Activity + ?Sized,
{
    let mut cycles = 0u64;
    while !shutdown.load(Ordering::Acquire) {
        if activity.cycle().is_err() {
            warn!("{}: cycle failed, idling", activity.id().as_str());
            let _ = activity.idle();
        }
        cycles = cycles.wrapping_add(1);
    }
    cycles
}
