//! Windows input injection via the SendInput API.
//!
//! Keys are injected as hardware scan codes (`KEYEVENTF_SCANCODE`), which is
//! what DirectInput-based games read.  Extended keys carry
//! `KEYEVENTF_EXTENDEDKEY`; while Num Lock is on they are preceded by a bare
//! `0xE0` scan event, otherwise the numpad layer swallows the arrow and
//! navigation keys.

#![cfg(target_os = "windows")]

use directinput_core::geometry::{MouseButton, Point, Size};
use directinput_core::keymap::ScanKey;
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetKeyState, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT,
    KEYBD_EVENT_FLAGS, KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, KEYEVENTF_SCANCODE,
    KEYEVENTF_UNICODE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN,
    MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL,
    MOUSEEVENTF_XDOWN, MOUSEEVENTF_XUP, MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY, VK_NUMLOCK,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CYSCREEN, XBUTTON1, XBUTTON2,
};

use crate::application::simulate_input::{KeyDirection, PlatformInputSimulator, SimulationError};

/// Scan code sent ahead of extended keys while Num Lock is on.
const EXTENDED_PREFIX: u16 = 0xE0;

/// Windows implementation of [`PlatformInputSimulator`] using SendInput.
pub struct WindowsInputSimulator;

impl WindowsInputSimulator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsInputSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformInputSimulator for WindowsInputSimulator {
    fn send_keys(&self, keys: &[ScanKey], direction: KeyDirection) -> Result<(), SimulationError> {
        if keys.is_empty() {
            return Ok(());
        }
        send(&scan_inputs(keys, direction, num_lock_on()))
    }

    fn send_virtual_key(&self, vk: u8, direction: KeyDirection) -> Result<(), SimulationError> {
        let flags = match direction {
            KeyDirection::Down => KEYBD_EVENT_FLAGS(0),
            KeyDirection::Up => KEYEVENTF_KEYUP,
        };
        send(&[keyboard_input(VIRTUAL_KEY(u16::from(vk)), 0, flags)])
    }

    fn send_unicode(&self, ch: char, direction: KeyDirection) -> Result<(), SimulationError> {
        send(&unicode_inputs(ch, direction))
    }

    fn send_mouse_button(
        &self,
        button: MouseButton,
        direction: KeyDirection,
    ) -> Result<(), SimulationError> {
        let (flags, mouse_data) = button_flags(button, direction);
        send(&[mouse_input(flags, mouse_data)])
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), SimulationError> {
        // SAFETY: SetCursorPos takes plain integers and has no preconditions.
        unsafe { SetCursorPos(point.x, point.y) }
            .map_err(|e| SimulationError::Platform(format!("SetCursorPos failed: {e}")))
    }

    fn cursor_position(&self) -> Result<Point, SimulationError> {
        let mut cursor = POINT::default();
        // SAFETY: `cursor` is a valid, writable POINT on the stack.
        unsafe { GetCursorPos(&mut cursor) }
            .map_err(|e| SimulationError::Platform(format!("GetCursorPos failed: {e}")))?;
        Ok(Point::new(cursor.x, cursor.y))
    }

    fn scroll_wheel(&self, clicks: i32) -> Result<(), SimulationError> {
        // mouseData is reinterpreted as a signed wheel delta.
        send(&[mouse_input(MOUSEEVENTF_WHEEL, clicks as u32)])
    }

    fn display_size(&self) -> Result<Size, SimulationError> {
        // SAFETY: GetSystemMetrics is always safe to call.
        let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        if width <= 0 || height <= 0 {
            return Err(SimulationError::Platform(
                "GetSystemMetrics returned no primary display".to_string(),
            ));
        }
        Ok(Size::new(width as u32, height as u32))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn num_lock_on() -> bool {
    // SAFETY: GetKeyState has no preconditions; bit 0 is the toggle state.
    let state = unsafe { GetKeyState(i32::from(VK_NUMLOCK.0)) };
    (state & 1) != 0
}

/// Builds the scan-code events for one batch of keys.
fn scan_inputs(keys: &[ScanKey], direction: KeyDirection, num_lock: bool) -> Vec<INPUT> {
    let up = match direction {
        KeyDirection::Down => KEYBD_EVENT_FLAGS(0),
        KeyDirection::Up => KEYEVENTF_KEYUP,
    };

    let mut inputs = Vec::with_capacity(keys.len() * 2);
    for key in keys {
        let mut flags = KEYEVENTF_SCANCODE | up;
        if key.extended {
            flags |= KEYEVENTF_EXTENDEDKEY;
            if num_lock {
                inputs.push(keyboard_input(VIRTUAL_KEY(0), EXTENDED_PREFIX, KEYEVENTF_SCANCODE | up));
            }
        }
        inputs.push(keyboard_input(VIRTUAL_KEY(0), key.code, flags));
    }
    inputs
}

/// One event per UTF-16 unit; characters outside the BMP need two.
fn unicode_inputs(ch: char, direction: KeyDirection) -> Vec<INPUT> {
    let mut flags = KEYEVENTF_UNICODE;
    if direction == KeyDirection::Up {
        flags |= KEYEVENTF_KEYUP;
    }
    let mut units = [0u16; 2];
    ch.encode_utf16(&mut units)
        .iter()
        .map(|&unit| keyboard_input(VIRTUAL_KEY(0), unit, flags))
        .collect()
}

fn button_flags(button: MouseButton, direction: KeyDirection) -> (MOUSE_EVENT_FLAGS, u32) {
    let down = direction == KeyDirection::Down;
    match (button, down) {
        (MouseButton::Left, true) => (MOUSEEVENTF_LEFTDOWN, 0),
        (MouseButton::Left, false) => (MOUSEEVENTF_LEFTUP, 0),
        (MouseButton::Right, true) => (MOUSEEVENTF_RIGHTDOWN, 0),
        (MouseButton::Right, false) => (MOUSEEVENTF_RIGHTUP, 0),
        (MouseButton::Middle, true) => (MOUSEEVENTF_MIDDLEDOWN, 0),
        (MouseButton::Middle, false) => (MOUSEEVENTF_MIDDLEUP, 0),
        (MouseButton::X1, true) => (MOUSEEVENTF_XDOWN, XBUTTON1 as u32),
        (MouseButton::X1, false) => (MOUSEEVENTF_XUP, XBUTTON1 as u32),
        (MouseButton::X2, true) => (MOUSEEVENTF_XDOWN, XBUTTON2 as u32),
        (MouseButton::X2, false) => (MOUSEEVENTF_XUP, XBUTTON2 as u32),
    }
}

fn keyboard_input(vk: VIRTUAL_KEY, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn mouse_input(flags: MOUSE_EVENT_FLAGS, mouse_data: u32) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: mouse_data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send(inputs: &[INPUT]) -> Result<(), SimulationError> {
    // SAFETY: every element is a fully initialised INPUT and cbSize matches.
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(SimulationError::Platform(format!(
            "SendInput injected {sent} of {} events (blocked by another desktop or a higher-integrity window?)",
            inputs.len()
        )));
    }
    Ok(())
}
