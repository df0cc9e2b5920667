//! Motion module for stepper-sync.
//!
//! Wraps motor channels into independently scheduled activities, owns them
//! in a [`MotionSupervisor`], and exposes the command side as a
//! [`CommandPort`].

mod activity;
mod command;
mod supervisor;
#[cfg(test)]
pub(crate) mod testing;

pub use activity::{run_until, Activity, PlainActivity, SyncedActivity};
pub use command::CommandPort;
pub use supervisor::MotionSupervisor;
