//! Sync parameters and status shared with the command side.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::config::SyncConfig;

use super::controller::{SyncPhase, SyncStatus};

/// Pause duration, confirmation count and debounce window.
///
/// Written by the command side, read by the sync controller at the start of
/// each edge episode. Each value is one atomic word.
#[derive(Debug)]
pub struct SyncSettings {
    pause_us: AtomicU32,
    confirm_steps: AtomicU32,
    debounce_us: AtomicU32,
}

impl SyncSettings {
    /// Settings with factory defaults, usable in a `static`.
    pub const fn new() -> Self {
        Self::with_values(
            SyncConfig::DEFAULT.pause_duration_ms,
            SyncConfig::DEFAULT.confirm_step_count,
            SyncConfig::DEFAULT.debounce_ms,
        )
    }

    /// Settings from explicit millisecond values.
    pub const fn with_values(pause_ms: u32, confirm_steps: u32, debounce_ms: u32) -> Self {
        Self {
            pause_us: AtomicU32::new(pause_ms.saturating_mul(1000)),
            confirm_steps: AtomicU32::new(confirm_steps),
            debounce_us: AtomicU32::new(debounce_ms.saturating_mul(1000)),
        }
    }

    /// Overwrite everything from a configuration.
    pub fn apply(&self, config: &SyncConfig) {
        self.pause_us.store(config.pause_duration_us(), Ordering::Release);
        self.set_confirm_steps(config.confirm_step_count);
        self.debounce_us.store(config.debounce_us(), Ordering::Release);
    }

    /// Set the pause duration in milliseconds.
    pub fn set_pause_ms(&self, pause_ms: u32) {
        self.pause_us.store(pause_ms.saturating_mul(1000), Ordering::Release);
    }

    /// Set the number of confirmation steps.
    pub fn set_confirm_steps(&self, steps: u32) {
        self.confirm_steps.store(steps, Ordering::Release);
    }

    /// Set the debounce window in milliseconds.
    pub fn set_debounce_ms(&self, debounce_ms: u32) {
        self.debounce_us.store(debounce_ms.saturating_mul(1000), Ordering::Release);
    }

    /// Pause duration in microseconds.
    pub fn pause_us(&self) -> u32 {
        self.pause_us.load(Ordering::Acquire)
    }

    /// Pause duration in milliseconds.
    pub fn pause_ms(&self) -> u32 {
        self.pause_us() / 1000
    }

    /// Number of confirmation steps.
    pub fn confirm_steps(&self) -> u32 {
        self.confirm_steps.load(Ordering::Acquire)
    }

    /// Debounce window in microseconds.
    pub fn debounce_us(&self) -> u32 {
        self.debounce_us.load(Ordering::Acquire)
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&SyncConfig> for SyncSettings {
    fn from(config: &SyncConfig) -> Self {
        let settings = Self::new();
        settings.apply(config);
        settings
    }
}

/// Sync state published by the controller for status queries.
///
/// The controller is the only writer; the command side only reads. The
/// fields are stored one by one, so a reader may see a mix of two
/// consecutive cycles.
#[derive(Debug)]
pub struct SyncReport {
    phase: AtomicU8,
    confirm_remaining: AtomicU32,
    /// 0 means no pause has happened yet.
    saved_interval_us: AtomicU32,
    episodes: AtomicU32,
}

impl SyncReport {
    /// Empty report in WATCHING, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(0),
            confirm_remaining: AtomicU32::new(0),
            saved_interval_us: AtomicU32::new(0),
            episodes: AtomicU32::new(0),
        }
    }

    pub(crate) fn publish(&self, status: &SyncStatus) {
        let phase = match status.phase {
            SyncPhase::Watching => 0,
            SyncPhase::Confirming => 1,
            SyncPhase::Paused => 2,
            SyncPhase::HoldingHigh => 3,
        };
        self.phase.store(phase, Ordering::Release);
        self.confirm_remaining
            .store(status.confirm_steps_remaining, Ordering::Release);
        self.saved_interval_us
            .store(status.saved_interval_us.unwrap_or(0), Ordering::Release);
        self.episodes.store(status.episodes, Ordering::Release);
    }

    /// Last published status.
    pub fn status(&self) -> SyncStatus {
        let phase = match self.phase.load(Ordering::Acquire) {
            1 => SyncPhase::Confirming,
            2 => SyncPhase::Paused,
            3 => SyncPhase::HoldingHigh,
            _ => SyncPhase::Watching,
        };
        SyncStatus {
            phase,
            confirm_steps_remaining: self.confirm_remaining.load(Ordering::Acquire),
            saved_interval_us: match self.saved_interval_us.load(Ordering::Acquire) {
                0 => None,
                us => Some(us),
            },
            episodes: self.episodes.load(Ordering::Acquire),
        }
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}
