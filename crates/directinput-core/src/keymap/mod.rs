//! Key-name translation tables.
//!
//! Callers name keys the way they appear on the keyboard: `"a"`, `"A"`, `"!"`,
//! `"ctrl"`, `"pagedown"`, `"num5"`, `"f12"`.  Windows needs two different
//! numeric encodings for those names:
//!
//! - **Scan codes** ([`scan_code`]) identify the physical key and are what
//!   `SendInput` injects with `KEYEVENTF_SCANCODE`.  Some keys share a scan
//!   code with another key and are told apart by the *extended* prefix
//!   (`0xE0`), e.g. the arrow keys and the numpad digits.
//! - **Virtual-key codes** ([`virtual_key`]) identify the logical key and are
//!   what `GetAsyncKeyState` reports.  Mouse buttons have virtual-key codes
//!   too, so detection names such as `"left_mouse"` live in this table.
//!
//! Shifted symbols (`"!"`, `"{"`, upper-case letters) map to the same codes as
//! their unshifted key; [`KeyMapper::requires_shift`] tells the injector to
//! wrap them in a Shift press.

pub mod scan_code;
pub mod virtual_key;

use serde::{Deserialize, Serialize};

/// A hardware scan code plus the extended-key flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanKey {
    /// Set 1 make code (without the `0xE0` prefix).
    pub code: u16,
    /// `true` when the key is sent with `KEYEVENTF_EXTENDEDKEY`.
    pub extended: bool,
}

impl ScanKey {
    /// A regular (non-extended) key.
    pub const fn new(code: u16) -> Self {
        Self {
            code,
            extended: false,
        }
    }

    /// A key that needs the `0xE0` extended prefix.
    pub const fn extended(code: u16) -> Self {
        Self {
            code,
            extended: true,
        }
    }
}

/// Virtual-key code of the Shift key (`VK_SHIFT`).
pub const VK_SHIFT: u8 = 0x10;

/// Characters that are typed with Shift held on a US layout.
const SHIFTED_SYMBOLS: &[&str] = &[
    ")", "!", "@", "#", "$", "%", "^", "&", "*", "(", "~", "_", "+", "{", "}", "|", ":", "\"",
    "\n", "<", ">", "?",
];

/// Unified key mapper providing all name lookups.
pub struct KeyMapper;

impl KeyMapper {
    /// Looks up the scan code for a key name.
    ///
    /// The lookup is case-insensitive.  Returns `None` for unknown names.
    pub fn scan_code(name: &str) -> Option<ScanKey> {
        scan_code::lookup(&normalize(name))
    }

    /// Looks up the Windows virtual-key code for a key or mouse-button name.
    ///
    /// The lookup is case-insensitive.  Returns `None` for unknown names.
    pub fn virtual_key(name: &str) -> Option<u8> {
        virtual_key::lookup(&normalize(name))
    }

    /// Returns `true` if the key name, exactly as written, is typed with Shift.
    ///
    /// Upper-case letters and shifted symbols qualify; `"a"` and `"ctrl"` do not.
    pub fn requires_shift(name: &str) -> bool {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => true,
            _ => SHIFTED_SYMBOLS.contains(&name),
        }
    }

    /// Returns `true` if the name resolves in either table.
    pub fn is_known(name: &str) -> bool {
        Self::scan_code(name).is_some() || Self::virtual_key(name).is_some()
    }
}

/// Lower-cases a key name for table lookup.
///
/// Single characters such as `"\n"` or `"!"` are unaffected.
fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_code_is_case_insensitive() {
        assert_eq!(KeyMapper::scan_code("A"), KeyMapper::scan_code("a"));
        assert_eq!(KeyMapper::scan_code("CTRL"), Some(ScanKey::new(0x1D)));
    }

    #[test]
    fn test_virtual_key_is_case_insensitive() {
        assert_eq!(KeyMapper::virtual_key("Esc"), Some(0x1B));
        assert_eq!(KeyMapper::virtual_key("F12"), Some(0x7B));
    }

    #[test]
    fn test_requires_shift_for_uppercase_letters() {
        assert!(KeyMapper::requires_shift("A"));
        assert!(!KeyMapper::requires_shift("a"));
    }

    #[test]
    fn test_requires_shift_for_shifted_symbols() {
        for symbol in ["!", "@", "{", "?", "\"", "\n"] {
            assert!(KeyMapper::requires_shift(symbol), "{symbol:?} needs shift");
        }
        for plain in ["1", "[", "/", "'", "enter", "shift"] {
            assert!(!KeyMapper::requires_shift(plain), "{plain:?} must not need shift");
        }
    }

    #[test]
    fn test_multi_character_names_never_require_shift() {
        assert!(!KeyMapper::requires_shift("ESC"));
        assert!(!KeyMapper::requires_shift("F1"));
    }

    #[test]
    fn test_unknown_name_is_not_known() {
        assert!(!KeyMapper::is_known("hyper"));
        assert!(KeyMapper::is_known("left_mouse"));
        assert!(KeyMapper::is_known("space"));
    }
}
