//! Infrastructure layer for the `directinput` crate.
//!
//! Contains OS-facing adapters: `SendInput` injection, global key-state
//! queries, config-file storage, and the process-wide default failsafe.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `directinput_core`, but MUST NOT be imported by the `application` layer.

pub mod default_failsafe;
pub mod input_simulation;
pub mod key_state;
pub mod storage;
