//! Platform-specific key-state queries.
//!
//! The correct implementation is selected at compile time and re-exported as
//! `NativeKeyState`.  On Windows it reads `GetAsyncKeyState`; elsewhere every
//! query returns [`KeyStateError::Unsupported`], which the failsafe treats as
//! "not pressed".
//!
//! [`mock::MockKeyState`] is always compiled so tests on any platform can use it.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsKeyState as NativeKeyState;

#[cfg(not(target_os = "windows"))]
pub use unsupported::UnsupportedKeyState as NativeKeyState;

#[cfg(not(target_os = "windows"))]
mod unsupported {
    use directinput_core::KeyStateError;

    use crate::application::detect_keys::PlatformKeyState;

    /// Stand-in for platforms without a global key-state API.
    #[derive(Debug, Default)]
    pub struct UnsupportedKeyState;

    impl UnsupportedKeyState {
        pub fn new() -> Self {
            Self
        }
    }

    impl PlatformKeyState for UnsupportedKeyState {
        fn is_virtual_key_down(&self, _vk: u8) -> Result<bool, KeyStateError> {
            Err(KeyStateError::Unsupported)
        }
    }
}
