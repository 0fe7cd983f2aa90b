//! Key-state oracle contract consumed by the failsafe.

use thiserror::Error;

/// Error type for key-state queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyStateError {
    /// The platform API call failed.
    #[error("platform error: {0}")]
    Platform(String),

    /// Key-state queries are not available on this platform.
    #[error("key state queries are not supported on this platform")]
    Unsupported,
}

/// Reports whether a key combination is physically held right now.
///
/// Implementations must treat unrecognised key names as "not pressed" rather
/// than as an error.  The failsafe treats any `Err` as "not pressed" for that
/// poll and keeps polling.
#[cfg_attr(test, mockall::automock)]
pub trait KeyStateOracle: Send + Sync {
    /// Returns `true` iff every named key or mouse button is currently down.
    fn is_pressed(&self, keys: &[String]) -> Result<bool, KeyStateError>;
}
