//! KeyDetector: answers "is this key combination held right now?".
//!
//! Key and mouse-button names are resolved to Windows virtual-key codes and
//! each code is checked through a [`PlatformKeyState`].  The detector is also
//! the production [`KeyStateOracle`] that drives the failsafe watchdog.

use std::sync::Arc;

use directinput_core::keymap::KeyMapper;
use directinput_core::{KeyStateError, KeyStateOracle};
use tracing::trace;

/// Platform-agnostic key-state query.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformKeyState: Send + Sync {
    /// Returns `true` if the key or button with virtual-key code `vk` is down.
    fn is_virtual_key_down(&self, vk: u8) -> Result<bool, KeyStateError>;
}

/// The Detect Keys use case.
#[derive(Clone)]
pub struct KeyDetector {
    platform: Arc<dyn PlatformKeyState>,
}

impl KeyDetector {
    pub fn new(platform: Arc<dyn PlatformKeyState>) -> Self {
        Self { platform }
    }

    /// Returns `true` iff every named key or mouse button is currently down.
    ///
    /// Names are case-insensitive.  An unknown name is never pressed, so any
    /// combination containing one reports `false`.
    ///
    /// # Errors
    ///
    /// Propagates the first platform error.
    pub fn detect<S: AsRef<str>>(&self, keys: &[S]) -> Result<bool, KeyStateError> {
        for key in keys {
            let key = key.as_ref();
            let Some(vk) = KeyMapper::virtual_key(key) else {
                trace!("unknown key name {key:?} reported as released");
                return Ok(false);
            };
            if !self.platform.is_virtual_key_down(vk)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl KeyStateOracle for KeyDetector {
    fn is_pressed(&self, keys: &[String]) -> Result<bool, KeyStateError> {
        self.detect(keys)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    const VK_CONTROL: u8 = 0x11;
    const VK_C: u8 = 0x43;
    const VK_LBUTTON: u8 = 0x01;

    fn detector(mock: MockPlatformKeyState) -> KeyDetector {
        KeyDetector::new(Arc::new(mock))
    }

    #[test]
    fn test_detect_all_keys_down_returns_true() {
        // Arrange
        let mut mock = MockPlatformKeyState::new();
        mock.expect_is_virtual_key_down()
            .with(eq(VK_CONTROL))
            .returning(|_| Ok(true));
        mock.expect_is_virtual_key_down()
            .with(eq(VK_C))
            .returning(|_| Ok(true));

        // Act
        let pressed = detector(mock).detect(&["ctrl", "c"]).unwrap();

        // Assert
        assert!(pressed);
    }

    #[test]
    fn test_detect_one_key_up_returns_false() {
        let mut mock = MockPlatformKeyState::new();
        mock.expect_is_virtual_key_down()
            .with(eq(VK_CONTROL))
            .returning(|_| Ok(true));
        mock.expect_is_virtual_key_down()
            .with(eq(VK_C))
            .returning(|_| Ok(false));

        assert!(!detector(mock).detect(&["ctrl", "c"]).unwrap());
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        let mut mock = MockPlatformKeyState::new();
        mock.expect_is_virtual_key_down()
            .with(eq(VK_CONTROL))
            .returning(|_| Ok(true));

        assert!(detector(mock).detect(&["CTRL"]).unwrap());
    }

    #[test]
    fn test_detect_mouse_button_name() {
        let mut mock = MockPlatformKeyState::new();
        mock.expect_is_virtual_key_down()
            .with(eq(VK_LBUTTON))
            .times(1)
            .returning(|_| Ok(true));

        assert!(detector(mock).detect(&["left_mouse"]).unwrap());
    }

    #[test]
    fn test_detect_unknown_name_is_not_pressed() {
        // Arrange – the platform must not even be asked
        let mut mock = MockPlatformKeyState::new();
        mock.expect_is_virtual_key_down().times(0);

        // Act
        let pressed = detector(mock).detect(&["definitely-not-a-key"]).unwrap();

        // Assert
        assert!(!pressed);
    }

    #[test]
    fn test_detect_propagates_platform_error() {
        let mut mock = MockPlatformKeyState::new();
        mock.expect_is_virtual_key_down()
            .returning(|_| Err(KeyStateError::Unsupported));

        let result = detector(mock).detect(&["esc"]);

        assert_eq!(result, Err(KeyStateError::Unsupported));
    }

    #[test]
    fn test_oracle_impl_delegates_to_detect() {
        let mut mock = MockPlatformKeyState::new();
        mock.expect_is_virtual_key_down().returning(|vk| Ok(vk == 0x1B));
        let oracle: Arc<dyn KeyStateOracle> = Arc::new(detector(mock));

        assert!(oracle.is_pressed(&["esc".to_string()]).unwrap());
        assert!(!oracle.is_pressed(&["f12".to_string()]).unwrap());
    }
}
