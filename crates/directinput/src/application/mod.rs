//! Application layer use cases.
//!
//! # What use cases are there?
//!
//! - **`simulate_input`** – Resolves key names and mouse buttons, applies
//!   Shift wrapping, press/release ordering, and delays, then hands single
//!   events to a `PlatformInputSimulator` injected at construction time.
//!
//! - **`detect_keys`** – Checks whether a key combination is held right now
//!   through a `PlatformKeyState`.  The resulting `KeyDetector` is what the
//!   failsafe watchdog polls.

pub mod detect_keys;
pub mod simulate_input;
