//! # directinput-core
//!
//! Shared library for DirectInput containing the key-name translation tables,
//! cursor geometry and motion planning, and the failsafe watchdog.
//!
//! This crate is used by the `directinput` application crate.  Apart from the
//! failsafe's default process-termination action, it has no dependencies on
//! OS APIs: everything that touches the keyboard, mouse, or screen lives behind
//! a trait implemented in the application crate's infrastructure layer.
//!
//! # Architecture overview (for beginners)
//!
//! DirectInput simulates keyboard and mouse input on Windows by injecting
//! hardware-level events (scan codes) through `SendInput`.  Many games read
//! scan codes directly and ignore the "virtual" key events that most
//! automation tools produce, which is why the scan-code path matters.
//!
//! This crate defines:
//!
//! - **`keymap`** – How human-readable key names (`"a"`, `"ctrl"`, `"f12"`,
//!   `"num+"`) translate to the two Windows encodings: hardware scan codes for
//!   injection and virtual-key codes for state detection.
//!
//! - **`geometry`** – Screen points, display sizes, mouse buttons, and the
//!   linear path the cursor follows during a timed move.
//!
//! - **`failsafe`** – A background watchdog that aborts the process when the
//!   user holds a key combination (Esc by default) for a few seconds.  Automation
//!   scripts that grab the mouse can otherwise be very hard to stop.

pub mod failsafe;
pub mod geometry;
pub mod keymap;

pub use failsafe::{
    Failsafe, FailsafeError, FailsafeOptions, FailsafeUpdate, KeyStateError, KeyStateOracle,
    TriggerCallback, WeakFailsafe,
};
pub use geometry::{linear_path, MouseButton, ParseButtonError, PathStep, Point, Size};
pub use keymap::{KeyMapper, ScanKey};
