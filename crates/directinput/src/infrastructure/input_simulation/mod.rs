//! Platform-specific input injection implementations.
//!
//! The correct implementation is selected at compile time and re-exported as
//! `NativeInputSimulator`:
//!
//! | Module    | OS      | API used                                   |
//! |-----------|---------|--------------------------------------------|
//! | `windows` | Windows | `SendInput`, `SetCursorPos`, `GetCursorPos` |
//! | (none)    | others  | every call returns `Unsupported`           |
//!
//! [`mock::MockInputSimulator`] is always compiled so tests on any platform
//! can use it.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsInputSimulator as NativeInputSimulator;

#[cfg(not(target_os = "windows"))]
pub use unsupported::UnsupportedInputSimulator as NativeInputSimulator;

#[cfg(not(target_os = "windows"))]
mod unsupported {
    use directinput_core::geometry::{MouseButton, Point, Size};
    use directinput_core::keymap::ScanKey;

    use crate::application::simulate_input::{
        KeyDirection, PlatformInputSimulator, SimulationError,
    };

    /// Stand-in for platforms without a scan-code injection API.
    #[derive(Debug, Default)]
    pub struct UnsupportedInputSimulator;

    impl UnsupportedInputSimulator {
        pub fn new() -> Self {
            Self
        }
    }

    impl PlatformInputSimulator for UnsupportedInputSimulator {
        fn send_keys(&self, _: &[ScanKey], _: KeyDirection) -> Result<(), SimulationError> {
            Err(SimulationError::Unsupported)
        }

        fn send_virtual_key(&self, _: u8, _: KeyDirection) -> Result<(), SimulationError> {
            Err(SimulationError::Unsupported)
        }

        fn send_unicode(&self, _: char, _: KeyDirection) -> Result<(), SimulationError> {
            Err(SimulationError::Unsupported)
        }

        fn send_mouse_button(&self, _: MouseButton, _: KeyDirection) -> Result<(), SimulationError> {
            Err(SimulationError::Unsupported)
        }

        fn set_cursor_position(&self, _: Point) -> Result<(), SimulationError> {
            Err(SimulationError::Unsupported)
        }

        fn cursor_position(&self) -> Result<Point, SimulationError> {
            Err(SimulationError::Unsupported)
        }

        fn scroll_wheel(&self, _: i32) -> Result<(), SimulationError> {
            Err(SimulationError::Unsupported)
        }

        fn display_size(&self) -> Result<Size, SimulationError> {
            Err(SimulationError::Unsupported)
        }
    }
}
