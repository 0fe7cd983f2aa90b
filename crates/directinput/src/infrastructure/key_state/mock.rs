//! Mock key-state backend for testing.
//!
//! Tests "press" virtual-key codes with [`MockKeyState::press`] and the
//! detector or failsafe sees them as held.  Every query is counted so tests
//! can check that polling started or stopped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use directinput_core::KeyStateError;

use crate::application::detect_keys::PlatformKeyState;

/// A keyboard whose held keys are set by the test.
#[derive(Default)]
pub struct MockKeyState {
    /// Virtual-key codes currently held.
    pub pressed: Mutex<HashSet<u8>>,
    /// Number of `is_virtual_key_down` calls so far.
    pub queries: AtomicUsize,
    /// When `true`, every query returns `KeyStateError::Platform`.
    pub should_fail: bool,
}

impl MockKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, vk: u8) {
        lock(&self.pressed).insert(vk);
    }

    pub fn release(&self, vk: u8) {
        lock(&self.pressed).remove(&vk);
    }

    pub fn release_all(&self) {
        lock(&self.pressed).clear();
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlatformKeyState for MockKeyState {
    fn is_virtual_key_down(&self, vk: u8) -> Result<bool, KeyStateError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(KeyStateError::Platform("mock failure".into()));
        }
        Ok(lock(&self.pressed).contains(&vk))
    }
}
