//! Key name → Windows Virtual Key (VK) code table.
//!
//! Reference: https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes
//!
//! VK codes are what `GetAsyncKeyState` understands, so this table drives key
//! detection and the failsafe.  Left/right variants of a modifier resolve to the
//! generic modifier VK (`VK_SHIFT`, `VK_CONTROL`, `VK_MENU`), which Windows
//! reports as down when either side is held.  Mouse buttons are included under
//! their detection names.

/// Looks up a normalised (lower-case) key or mouse-button name.
pub fn lookup(name: &str) -> Option<u8> {
    // Letters and digits share their ASCII upper-case value.
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return Some(c.to_ascii_uppercase() as u8);
        }
        if c.is_ascii_digit() {
            return Some(c as u8);
        }
    }

    let vk = match name {
        // ── Mouse buttons ────────────────────────────────────────────────────
        "left_mouse" => 0x01,
        "right_mouse" => 0x02,
        "middle_mouse" => 0x04,
        "xbutton1" => 0x05,
        "xbutton2" => 0x06,

        // ── Shifted digit row ────────────────────────────────────────────────
        ")" => 0x30,
        "!" => 0x31,
        "@" => 0x32,
        "#" => 0x33,
        "$" => 0x34,
        "%" => 0x35,
        "^" => 0x36,
        "&" => 0x37,
        "*" => 0x38,
        "(" => 0x39,

        // ── Numpad ───────────────────────────────────────────────────────────
        "num0" => 0x60,
        "num1" => 0x61,
        "num2" => 0x62,
        "num3" => 0x63,
        "num4" => 0x64,
        "num5" => 0x65,
        "num6" => 0x66,
        "num7" => 0x67,
        "num8" => 0x68,
        "num9" => 0x69,
        "num*" => 0x6A,
        "num+" => 0x6B,
        "num-" => 0x6D,
        "num." => 0x6E,
        "num/" => 0x6F,

        // ── Arrows and navigation cluster ────────────────────────────────────
        "left" => 0x25,
        "up" => 0x26,
        "right" => 0x27,
        "down" => 0x28,
        "pageup" => 0x21,
        "pagedown" => 0x22,
        "end" => 0x23,
        "home" => 0x24,
        "prtsc" | "sysrq" => 0x2C,
        "insert" => 0x2D,
        "delete" => 0x2E,

        // ── Control keys ─────────────────────────────────────────────────────
        "backspace" | "\u{8}" => 0x08,
        "tab" | "\t" => 0x09,
        "enter" | "numenter" | "\n" | "\r" => 0x0D,
        "shift" | "lshift" | "rshift" => 0x10,
        "ctrl" | "lctrl" | "rctrl" => 0x11,
        "alt" | "lalt" | "ralt" => 0x12,
        "capslock" => 0x14,
        "esc" => 0x1B,
        "space" | " " => 0x20,
        "win" | "lwin" => 0x5B,
        "rwin" => 0x5C,
        "apps" => 0x5D,
        "numlock" => 0x90,
        "scrolllock" => 0x91,

        // ── Function keys ────────────────────────────────────────────────────
        "f1" => 0x70,
        "f2" => 0x71,
        "f3" => 0x72,
        "f4" => 0x73,
        "f5" => 0x74,
        "f6" => 0x75,
        "f7" => 0x76,
        "f8" => 0x77,
        "f9" => 0x78,
        "f10" => 0x79,
        "f11" => 0x7A,
        "f12" => 0x7B,

        // ── OEM punctuation (US layout) ──────────────────────────────────────
        ";" | ":" => 0xBA,
        "=" | "+" => 0xBB,
        "," | "<" => 0xBC,
        "-" | "_" => 0xBD,
        "." | ">" => 0xBE,
        "/" | "?" => 0xBF,
        "`" | "~" => 0xC0,
        "[" | "{" => 0xDB,
        "\\" | "|" => 0xDC,
        "]" | "}" => 0xDD,
        "'" | "\"" => 0xDE,

        _ => return None,
    };
    Some(vk)
}
