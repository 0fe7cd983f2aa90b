//! Windows key-state queries via `GetAsyncKeyState`.

#![cfg(target_os = "windows")]

use directinput_core::KeyStateError;
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;

use crate::application::detect_keys::PlatformKeyState;

/// Windows implementation of [`PlatformKeyState`].
///
/// Reports the physical state at the time of the call, independent of which
/// window has focus.  Mouse buttons are reported under their virtual-key codes
/// (`VK_LBUTTON`, `VK_XBUTTON1`, ...).
pub struct WindowsKeyState;

impl WindowsKeyState {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsKeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformKeyState for WindowsKeyState {
    fn is_virtual_key_down(&self, vk: u8) -> Result<bool, KeyStateError> {
        // SAFETY: GetAsyncKeyState takes a plain integer and has no preconditions.
        let state = unsafe { GetAsyncKeyState(i32::from(vk)) };
        // The most significant bit is set while the key is down.
        Ok(state < 0)
    }
}
