//! Process-wide default failsafe.
//!
//! Scripts that only want "make sure I can always bail out" should not have to
//! thread a [`Failsafe`] handle through their code.  These functions manage
//! one shared instance, started lazily on first use with the native key-state
//! backend and [`FailsafeOptions::default`] (hold Esc for five seconds to
//! terminate the process).
//!
//! `directinput_core` knows nothing about this module; callers that want
//! several independent watchdogs construct [`Failsafe`] values directly.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use directinput_core::{Failsafe, FailsafeError, FailsafeOptions, FailsafeUpdate};
use tracing::info;

use crate::application::detect_keys::KeyDetector;
use crate::infrastructure::key_state::NativeKeyState;

static DEFAULT: Mutex<Option<Failsafe>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Failsafe>> {
    DEFAULT.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn(options: FailsafeOptions) -> Result<Failsafe, FailsafeError> {
    let detector = KeyDetector::new(Arc::new(NativeKeyState::new()));
    Failsafe::start(Arc::new(detector), options)
}

/// Returns the shared instance, starting it with default options if needed.
///
/// # Errors
///
/// Returns [`FailsafeError::Spawn`] if the polling thread cannot be created.
pub fn default_failsafe() -> Result<Failsafe, FailsafeError> {
    let mut slot = slot();
    if let Some(failsafe) = slot.as_ref() {
        return Ok(failsafe.clone());
    }
    let failsafe = spawn(FailsafeOptions::default())?;
    *slot = Some(failsafe.clone());
    Ok(failsafe)
}

/// Replaces the shared instance with one started from `options`.
///
/// Any previous instance is stopped first.
pub fn init_failsafe(options: FailsafeOptions) -> Result<Failsafe, FailsafeError> {
    let previous = slot().take();
    if let Some(previous) = previous {
        previous.stop();
    }

    let failsafe = spawn(options)?;
    *slot() = Some(failsafe.clone());
    Ok(failsafe)
}

pub fn enable_failsafe() -> Result<(), FailsafeError> {
    default_failsafe()?.enable();
    Ok(())
}

pub fn disable_failsafe() -> Result<(), FailsafeError> {
    default_failsafe()?.disable();
    Ok(())
}

/// Applies `update` to the shared instance, starting it first if needed.
pub fn configure_failsafe(update: FailsafeUpdate) -> Result<(), FailsafeError> {
    default_failsafe()?.configure(update);
    Ok(())
}

/// Stops and forgets the shared instance.  A later call to any of the other
/// functions starts a fresh one.
pub fn stop_failsafe() {
    // Release the slot before joining: the trigger callback may call back in.
    let current = slot().take();
    if let Some(failsafe) = current {
        failsafe.stop();
        info!("default failsafe released");
    }
}
