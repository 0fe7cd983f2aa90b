//! Failsafe watchdog: abort the process when a key combination is held.
//!
//! Input automation can take over the mouse and keyboard so thoroughly that the
//! user cannot reach the terminal to stop it.  The failsafe gives them a way out:
//! holding the trigger combination (Esc by default) for the hold duration (five
//! seconds by default) fires the trigger action, which by default terminates
//! the whole process immediately.
//!
//! # How it works
//!
//! [`Failsafe::start`] spawns one background thread that polls a
//! [`KeyStateOracle`] every `poll_interval` (100 ms by default):
//!
//! ```text
//!   poll ──► disabled? ──yes──► reset streak
//!             │ no
//!             ▼
//!   all trigger keys down? ──no──► reset streak
//!             │ yes
//!             ▼
//!   streak running? ──no──► start streak (log notice)
//!             │ yes
//!             ▼
//!   held ≥ hold_duration? ──yes──► fire trigger once, exit loop
//! ```
//!
//! Releasing any key of the combination, disabling the failsafe, or changing
//! the trigger keys or hold duration all reset the streak to zero.  There is no partial credit.
//!
//! # Module layout
//!
//! - [`oracle`] – the key-state query contract the watchdog consumes.
//! - [`hold`] – the pure hold-streak state machine (no threads, no clock).
//! - [`config`] – construction options and partial updates.
//! - [`watchdog`] – the [`Failsafe`] handle and its polling thread.
//! - [`terminate`] – the default, non-graceful abort action.

pub mod config;
pub mod hold;
pub mod oracle;
pub mod terminate;
pub mod watchdog;

use thiserror::Error;

pub use config::{
    hold_duration_from_secs, FailsafeOptions, FailsafeUpdate, TriggerCallback,
    DEFAULT_HOLD_DURATION, DEFAULT_POLL_INTERVAL, DEFAULT_TRIGGER_KEY,
};
pub use hold::{HoldStep, HoldTracker};
pub use oracle::{KeyStateError, KeyStateOracle};
pub use terminate::{terminate_process, FAILSAFE_EXIT_CODE};
pub use watchdog::{Failsafe, WeakFailsafe, STOP_TIMEOUT};

/// Error type for failsafe construction.
#[derive(Debug, Error)]
pub enum FailsafeError {
    /// The trigger combination has no keys; it would be "pressed" vacuously.
    #[error("failsafe trigger combination must contain at least one key")]
    EmptyTriggerKeys,

    /// The hold duration is negative, NaN, or too large to represent.
    #[error("invalid failsafe hold duration: {0} seconds")]
    InvalidHoldDuration(f64),

    /// The poll interval must be non-zero.
    #[error("failsafe poll interval must be greater than zero")]
    ZeroPollInterval,

    /// The OS refused to create the polling thread.
    #[error("failed to spawn failsafe thread: {0}")]
    Spawn(#[from] std::io::Error),
}
