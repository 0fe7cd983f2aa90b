//! Key name → hardware scan code table (scan code set 1).
//!
//! Reference: "Keyboard Scan Code Specification" (Microsoft) and the
//! `MapVirtualKey(vk, MAPVK_VK_TO_VSC)` values for the extended keys.
//!
//! # Why scan codes? (for beginners)
//!
//! A scan code is the number the keyboard hardware itself sends when a key goes
//! down.  Injecting scan codes (instead of virtual keys) makes the simulated
//! event indistinguishable from a real key press for applications that read
//! raw input, which includes most games using DirectInput.
//!
//! Keys added to the keyboard after the original PC/XT layout reuse an older
//! key's code behind an `0xE0` prefix.  Right Ctrl is `E0 1D` while Left Ctrl
//! is `1D`; the Up arrow is `E0 48` while numpad 8 is `48`.  Those entries are
//! marked with [`ScanKey::extended`].

use super::ScanKey;

/// Looks up a normalised (lower-case) key name.
pub fn lookup(name: &str) -> Option<ScanKey> {
    let key = match name {
        // ── Letters ──────────────────────────────────────────────────────────
        "a" => ScanKey::new(0x1E),
        "b" => ScanKey::new(0x30),
        "c" => ScanKey::new(0x2E),
        "d" => ScanKey::new(0x20),
        "e" => ScanKey::new(0x12),
        "f" => ScanKey::new(0x21),
        "g" => ScanKey::new(0x22),
        "h" => ScanKey::new(0x23),
        "i" => ScanKey::new(0x17),
        "j" => ScanKey::new(0x24),
        "k" => ScanKey::new(0x25),
        "l" => ScanKey::new(0x26),
        "m" => ScanKey::new(0x32),
        "n" => ScanKey::new(0x31),
        "o" => ScanKey::new(0x18),
        "p" => ScanKey::new(0x19),
        "q" => ScanKey::new(0x10),
        "r" => ScanKey::new(0x13),
        "s" => ScanKey::new(0x1F),
        "t" => ScanKey::new(0x14),
        "u" => ScanKey::new(0x16),
        "v" => ScanKey::new(0x2F),
        "w" => ScanKey::new(0x11),
        "x" => ScanKey::new(0x2D),
        "y" => ScanKey::new(0x15),
        "z" => ScanKey::new(0x2C),

        // ── Digit row (shifted symbols share the digit's code) ───────────────
        "1" | "!" => ScanKey::new(0x02),
        "2" | "@" => ScanKey::new(0x03),
        "3" | "#" => ScanKey::new(0x04),
        "4" | "$" => ScanKey::new(0x05),
        "5" | "%" => ScanKey::new(0x06),
        "6" | "^" => ScanKey::new(0x07),
        "7" | "&" => ScanKey::new(0x08),
        "8" | "*" => ScanKey::new(0x09),
        "9" | "(" => ScanKey::new(0x0A),
        "0" | ")" => ScanKey::new(0x0B),

        // ── Numpad ───────────────────────────────────────────────────────────
        "num0" => ScanKey::new(0x52),
        "num1" => ScanKey::new(0x4F),
        "num2" => ScanKey::new(0x50),
        "num3" => ScanKey::new(0x51),
        "num4" => ScanKey::new(0x4B),
        "num5" => ScanKey::new(0x4C),
        "num6" => ScanKey::new(0x4D),
        "num7" => ScanKey::new(0x47),
        "num8" => ScanKey::new(0x48),
        "num9" => ScanKey::new(0x49),
        "num." => ScanKey::new(0x53),
        "num-" => ScanKey::new(0x4A),
        "num+" => ScanKey::new(0x4E),
        "num*" => ScanKey::new(0x37),
        "num/" => ScanKey::extended(0x35),
        "numenter" => ScanKey::extended(0x1C),

        // ── Arrows and navigation cluster ────────────────────────────────────
        "up" => ScanKey::extended(0x48),
        "left" => ScanKey::extended(0x4B),
        "down" => ScanKey::extended(0x50),
        "right" => ScanKey::extended(0x4D),
        "insert" => ScanKey::extended(0x52),
        "delete" => ScanKey::extended(0x53),
        "home" => ScanKey::extended(0x47),
        "end" => ScanKey::extended(0x4F),
        "pageup" => ScanKey::extended(0x49),
        "pagedown" => ScanKey::extended(0x51),
        "prtsc" | "sysrq" => ScanKey::extended(0x37),

        // ── Control keys ─────────────────────────────────────────────────────
        "space" | " " => ScanKey::new(0x39),
        "esc" => ScanKey::new(0x01),
        "tab" | "\t" => ScanKey::new(0x0F),
        "backspace" | "\u{8}" => ScanKey::new(0x0E),
        "enter" | "\n" | "\r" => ScanKey::new(0x1C),
        "shift" | "lshift" => ScanKey::new(0x2A),
        "rshift" => ScanKey::new(0x36),
        "ctrl" | "lctrl" => ScanKey::new(0x1D),
        "rctrl" => ScanKey::extended(0x1D),
        "alt" | "lalt" => ScanKey::new(0x38),
        "ralt" => ScanKey::extended(0x38),
        "win" | "lwin" => ScanKey::extended(0x5B),
        "rwin" => ScanKey::extended(0x5C),
        "apps" => ScanKey::extended(0x5D),
        "capslock" => ScanKey::new(0x3A),
        "numlock" => ScanKey::new(0x45),
        "scrolllock" => ScanKey::new(0x46),

        // ── Function keys ────────────────────────────────────────────────────
        "f1" => ScanKey::new(0x3B),
        "f2" => ScanKey::new(0x3C),
        "f3" => ScanKey::new(0x3D),
        "f4" => ScanKey::new(0x3E),
        "f5" => ScanKey::new(0x3F),
        "f6" => ScanKey::new(0x40),
        "f7" => ScanKey::new(0x41),
        "f8" => ScanKey::new(0x42),
        "f9" => ScanKey::new(0x43),
        "f10" => ScanKey::new(0x44),
        "f11" => ScanKey::new(0x57),
        "f12" => ScanKey::new(0x58),

        // ── Punctuation ──────────────────────────────────────────────────────
        "`" | "~" => ScanKey::new(0x29),
        "-" | "_" => ScanKey::new(0x0C),
        "=" | "+" => ScanKey::new(0x0D),
        "[" | "{" => ScanKey::new(0x1A),
        "]" | "}" => ScanKey::new(0x1B),
        "\\" | "|" => ScanKey::new(0x2B),
        ";" | ":" => ScanKey::new(0x27),
        "'" | "\"" => ScanKey::new(0x28),
        "," | "<" => ScanKey::new(0x33),
        "." | ">" => ScanKey::new(0x34),
        "/" | "?" => ScanKey::new(0x35),

        _ => return None,
    };
    Some(key)
}
