//! Mock platform input simulator for testing.
//!
//! # Why a mock simulator?
//!
//! The real simulator (`WindowsInputSimulator`) moves the cursor and presses
//! keys on the machine running the tests, and needs an interactive desktop.
//! `MockInputSimulator` replaces every OS call with in-memory recording:
//! each injected event is pushed into one `Mutex<Vec<SimulatedEvent>>`, so
//! assertions can check exactly what was sent and in what order, across
//! keyboard and mouse events alike.
//!
//! The cursor is simulated too: `set_cursor_position` updates it and
//! `cursor_position` reads it back, so timed cursor moves can be followed.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every method return
//! `SimulationError::Platform`, for testing error-handling paths.

use std::sync::{Mutex, MutexGuard};

use directinput_core::geometry::{MouseButton, Point, Size};
use directinput_core::keymap::ScanKey;

use crate::application::simulate_input::{KeyDirection, PlatformInputSimulator, SimulationError};

/// One injected event, as seen by [`MockInputSimulator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedEvent {
    /// A batch of scan-code events sent together.
    Keys(Vec<ScanKey>, KeyDirection),
    VirtualKey(u8, KeyDirection),
    Unicode(char, KeyDirection),
    MouseButton(MouseButton, KeyDirection),
    CursorMoved(Point),
    Scroll(i32),
}

/// A mock simulator that records all calls without performing OS API calls.
pub struct MockInputSimulator {
    /// Every event in injection order.
    pub events: Mutex<Vec<SimulatedEvent>>,
    /// The simulated cursor position.
    pub cursor: Mutex<Point>,
    /// Value returned by `display_size`.
    pub display: Size,
    /// When `true`, every method returns `SimulationError::Platform`.
    pub should_fail: bool,
}

impl Default for MockInputSimulator {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cursor: Mutex::new(Point::default()),
            display: Size::new(1920, 1080),
            should_fail: false,
        }
    }
}

impl MockInputSimulator {
    /// Creates a mock with a 1920×1080 display and the cursor at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock with the cursor at `point`.
    pub fn with_cursor(point: Point) -> Self {
        Self {
            cursor: Mutex::new(point),
            ..Self::default()
        }
    }

    /// Returns a copy of everything recorded so far.
    pub fn recorded(&self) -> Vec<SimulatedEvent> {
        lock(&self.events).clone()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    fn record(&self, event: SimulatedEvent) -> Result<(), SimulationError> {
        if self.should_fail {
            return Err(SimulationError::Platform("mock failure".into()));
        }
        lock(&self.events).push(event);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl PlatformInputSimulator for MockInputSimulator {
    fn send_keys(&self, keys: &[ScanKey], direction: KeyDirection) -> Result<(), SimulationError> {
        self.record(SimulatedEvent::Keys(keys.to_vec(), direction))
    }

    fn send_virtual_key(&self, vk: u8, direction: KeyDirection) -> Result<(), SimulationError> {
        self.record(SimulatedEvent::VirtualKey(vk, direction))
    }

    fn send_unicode(&self, ch: char, direction: KeyDirection) -> Result<(), SimulationError> {
        self.record(SimulatedEvent::Unicode(ch, direction))
    }

    fn send_mouse_button(
        &self,
        button: MouseButton,
        direction: KeyDirection,
    ) -> Result<(), SimulationError> {
        self.record(SimulatedEvent::MouseButton(button, direction))
    }

    /// Records the move and updates the simulated cursor.
    fn set_cursor_position(&self, point: Point) -> Result<(), SimulationError> {
        self.record(SimulatedEvent::CursorMoved(point))?;
        *lock(&self.cursor) = point;
        Ok(())
    }

    fn cursor_position(&self) -> Result<Point, SimulationError> {
        if self.should_fail {
            return Err(SimulationError::Platform("mock failure".into()));
        }
        Ok(*lock(&self.cursor))
    }

    fn scroll_wheel(&self, clicks: i32) -> Result<(), SimulationError> {
        self.record(SimulatedEvent::Scroll(clicks))
    }

    fn display_size(&self) -> Result<Size, SimulationError> {
        if self.should_fail {
            return Err(SimulationError::Platform("mock failure".into()));
        }
        Ok(self.display)
    }
}
