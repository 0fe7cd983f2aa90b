//! directinput library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does directinput do? (for beginners)
//!
//! It lets a program type and click as if a person were sitting at the
//! keyboard.  Keys are injected as hardware *scan codes* rather than the
//! virtual-key messages most automation tools send, so applications that
//! read the keyboard at a low level (DirectInput games in particular) see
//! them too.
//!
//! The crate is split in two layers:
//!
//! 1. **`application`** – the use cases.  [`InputSimulator`] turns key names
//!    like `"ctrl"` or `"A"` into ordered press/release events with the right
//!    delays, and [`KeyDetector`] answers "is this combination held right
//!    now?".  Neither touches the OS directly.
//! 2. **`infrastructure`** – the OS adapters (`SendInput`,
//!    `GetAsyncKeyState`), in-memory mocks for tests, the TOML config file,
//!    and a process-wide default failsafe.
//!
//! Because automation can grab the mouse so thoroughly that the user cannot
//! reach the terminal, the binary always runs a failsafe watchdog (from
//! `directinput_core`) unless told otherwise: hold Esc for five seconds and
//! the process is terminated.
//!
//! [`InputSimulator`]: application::simulate_input::InputSimulator
//! [`KeyDetector`]: application::detect_keys::KeyDetector

/// Application layer: input simulation and key detection use cases.
pub mod application;

/// Infrastructure layer: OS adapters, mocks, storage, and the default failsafe.
pub mod infrastructure;
