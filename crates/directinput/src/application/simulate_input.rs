//! InputSimulator: turns key names, mouse buttons, and cursor targets into
//! platform input events.
//!
//! This use case sits at the application layer and delegates to a
//! [`PlatformInputSimulator`] trait object for OS-level event injection.
//! Name resolution, shift wrapping, press/release ordering, and timing all
//! happen here; the platform implementation only injects single events.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use directinput_core::geometry::{linear_path, MouseButton, ParseButtonError, Point, Size};
use directinput_core::keymap::{KeyMapper, ScanKey, VK_SHIFT};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Error type for input simulation operations.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
    #[error("unknown mouse button: {0:?}")]
    UnknownButton(String),
    #[error("input simulation is not supported on this platform")]
    Unsupported,
}

impl From<ParseButtonError> for SimulationError {
    fn from(e: ParseButtonError) -> Self {
        Self::UnknownButton(e.0)
    }
}

/// Whether an event presses or releases a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDirection {
    Down,
    Up,
}

/// Default delay between a key press and its release.
pub const DEFAULT_KEY_DELAY: Duration = Duration::from_millis(10);

/// Default press/release delay used by [`InputSimulator::write`].
pub const DEFAULT_WRITE_KEY_DELAY: Duration = Duration::from_millis(30);

/// Default delays applied by callers that do not pass their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputTiming {
    pub key_delay: Duration,
    pub write_key_delay: Duration,
}

impl Default for InputTiming {
    fn default() -> Self {
        Self {
            key_delay: DEFAULT_KEY_DELAY,
            write_key_delay: DEFAULT_WRITE_KEY_DELAY,
        }
    }
}

/// Options for [`InputSimulator::key_press`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressOptions {
    /// How many times the whole key list is pressed.
    pub presses: u32,
    /// Pause after each release.
    pub interval: Duration,
    /// Pause between press and release.
    pub key_delay: Duration,
    /// Press all keys in one batch instead of one after another.
    pub simultaneously: bool,
}

impl Default for PressOptions {
    fn default() -> Self {
        Self {
            presses: 1,
            interval: Duration::ZERO,
            key_delay: DEFAULT_KEY_DELAY,
            simultaneously: false,
        }
    }
}

impl PressOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presses(mut self, presses: u32) -> Self {
        self.presses = presses;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn key_delay(mut self, key_delay: Duration) -> Self {
        self.key_delay = key_delay;
        self
    }

    pub fn simultaneously(mut self, simultaneously: bool) -> Self {
        self.simultaneously = simultaneously;
        self
    }
}

/// Platform-agnostic input injection trait.
///
/// Each supported OS provides an implementation in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformInputSimulator: Send + Sync {
    /// Injects one scan-code event per key, as a single batch, in order.
    fn send_keys(&self, keys: &[ScanKey], direction: KeyDirection) -> Result<(), SimulationError>;

    /// Injects a virtual-key event (used for the Shift wrapper and `write`).
    fn send_virtual_key(&self, vk: u8, direction: KeyDirection) -> Result<(), SimulationError>;

    /// Injects a Unicode character event for text with no key mapping.
    fn send_unicode(&self, ch: char, direction: KeyDirection) -> Result<(), SimulationError>;

    fn send_mouse_button(
        &self,
        button: MouseButton,
        direction: KeyDirection,
    ) -> Result<(), SimulationError>;

    /// Moves the cursor to an absolute screen position.
    fn set_cursor_position(&self, point: Point) -> Result<(), SimulationError>;

    fn cursor_position(&self) -> Result<Point, SimulationError>;

    /// Scrolls the vertical wheel; positive values scroll up.
    fn scroll_wheel(&self, clicks: i32) -> Result<(), SimulationError>;

    /// Size of the primary display in pixels.
    fn display_size(&self) -> Result<Size, SimulationError>;
}

/// A key name resolved to its scan code and shift requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedKey {
    scan: ScanKey,
    shift: bool,
}

/// Resolves every name up front so an unknown name aborts before any event.
fn resolve_keys<S: AsRef<str>>(keys: &[S]) -> Result<Vec<ResolvedKey>, SimulationError> {
    keys.iter()
        .map(|name| {
            let name = name.as_ref();
            let scan = KeyMapper::scan_code(name)
                .ok_or_else(|| SimulationError::UnknownKey(name.to_string()))?;
            Ok(ResolvedKey {
                scan,
                shift: KeyMapper::requires_shift(name),
            })
        })
        .collect()
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

/// The Simulate Input use case.
///
/// Cheap to clone; every clone shares the same platform simulator.
#[derive(Clone)]
pub struct InputSimulator {
    platform: Arc<dyn PlatformInputSimulator>,
    timing: InputTiming,
}

impl InputSimulator {
    /// Creates a new use case with the given platform simulator and default timing.
    pub fn new(platform: Arc<dyn PlatformInputSimulator>) -> Self {
        Self::with_timing(platform, InputTiming::default())
    }

    pub fn with_timing(platform: Arc<dyn PlatformInputSimulator>, timing: InputTiming) -> Self {
        Self { platform, timing }
    }

    pub fn timing(&self) -> InputTiming {
        self.timing
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    /// Presses each key in order without releasing it.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnknownKey`] before sending anything if any
    /// name is unknown, or the platform error of the first failed event.
    pub fn key_down<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), SimulationError> {
        let resolved = resolve_keys(keys)?;
        debug!("key down: {}", join_names(keys));
        self.send_each(&resolved, KeyDirection::Down)
    }

    /// Releases each key in order.
    ///
    /// # Errors
    ///
    /// Same as [`key_down`](Self::key_down).
    pub fn key_up<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), SimulationError> {
        let resolved = resolve_keys(keys)?;
        debug!("key up: {}", join_names(keys));
        self.send_each(&resolved, KeyDirection::Up)
    }

    /// Presses the keys now and releases them, in the same order, when the
    /// returned guard is dropped or [`KeyHold::release`]d.
    ///
    /// # Errors
    ///
    /// Same as [`key_down`](Self::key_down).  Keys already pressed when a
    /// platform error occurs are released again.
    pub fn key_hold<S: AsRef<str>>(&self, keys: &[S]) -> Result<KeyHold<'_>, SimulationError> {
        let resolved = resolve_keys(keys)?;
        debug!("key hold: {}", join_names(keys));
        let mut hold = KeyHold {
            simulator: self,
            keys: Vec::with_capacity(resolved.len()),
            released: false,
        };
        for key in resolved {
            self.send_key(key, KeyDirection::Down)?;
            hold.keys.push(key);
        }
        Ok(hold)
    }

    /// Taps the keys `options.presses` times.
    ///
    /// Sequential mode presses, waits `key_delay`, releases, and waits
    /// `interval` for each key in turn.  Simultaneous mode sends all presses
    /// as one batch, waits `key_delay`, sends all releases as one batch, and
    /// waits `interval`.
    ///
    /// # Errors
    ///
    /// Same as [`key_down`](Self::key_down).
    pub fn key_press<S: AsRef<str>>(
        &self,
        keys: &[S],
        options: PressOptions,
    ) -> Result<(), SimulationError> {
        let resolved = resolve_keys(keys)?;
        debug!("key press: {} {options:?}", join_names(keys));

        for _ in 0..options.presses {
            if options.simultaneously {
                let scans: Vec<ScanKey> = resolved.iter().map(|k| k.scan).collect();
                let shift = resolved.iter().any(|k| k.shift);
                if shift {
                    self.platform.send_virtual_key(VK_SHIFT, KeyDirection::Down)?;
                }
                self.platform.send_keys(&scans, KeyDirection::Down)?;
                pause(options.key_delay);
                self.platform.send_keys(&scans, KeyDirection::Up)?;
                if shift {
                    self.platform.send_virtual_key(VK_SHIFT, KeyDirection::Up)?;
                }
                pause(options.interval);
            } else {
                for key in &resolved {
                    self.tap(*key, options.key_delay)?;
                    pause(options.interval);
                }
            }
        }
        Ok(())
    }

    /// Presses the keys in order, then releases them in reverse order,
    /// waiting `key_delay` after every event.
    ///
    /// # Errors
    ///
    /// Same as [`key_down`](Self::key_down).
    pub fn hotkey<S: AsRef<str>>(&self, keys: &[S], key_delay: Duration) -> Result<(), SimulationError> {
        let resolved = resolve_keys(keys)?;
        debug!("hotkey: {}", join_names(keys));
        for key in &resolved {
            self.send_key(*key, KeyDirection::Down)?;
            pause(key_delay);
        }
        for key in resolved.iter().rev() {
            self.send_key(*key, KeyDirection::Up)?;
            pause(key_delay);
        }
        Ok(())
    }

    /// Types `text` one character at a time.
    ///
    /// Characters with a key mapping are tapped through their virtual-key code
    /// (wrapped in Shift when needed); anything else is injected as a Unicode
    /// character.  `interval` is waited after every character.
    pub fn write(&self, text: &str, interval: Duration, key_delay: Duration) -> Result<(), SimulationError> {
        debug!("write: {} chars", text.chars().count());
        for ch in text.chars() {
            let name = ch.to_string();
            match KeyMapper::virtual_key(&name) {
                Some(vk) => {
                    let shift = KeyMapper::requires_shift(&name);
                    if shift {
                        self.platform.send_virtual_key(VK_SHIFT, KeyDirection::Down)?;
                    }
                    self.platform.send_virtual_key(vk, KeyDirection::Down)?;
                    pause(key_delay);
                    self.platform.send_virtual_key(vk, KeyDirection::Up)?;
                    if shift {
                        self.platform.send_virtual_key(VK_SHIFT, KeyDirection::Up)?;
                    }
                }
                None => {
                    trace!("no key mapping for {ch:?}; sending as unicode");
                    self.platform.send_unicode(ch, KeyDirection::Down)?;
                    pause(key_delay);
                    self.platform.send_unicode(ch, KeyDirection::Up)?;
                }
            }
            pause(interval);
        }
        Ok(())
    }

    fn send_each(&self, keys: &[ResolvedKey], direction: KeyDirection) -> Result<(), SimulationError> {
        keys.iter().try_for_each(|key| self.send_key(*key, direction))
    }

    /// Sends one key event, wrapped in Shift down/up when the key needs it.
    fn send_key(&self, key: ResolvedKey, direction: KeyDirection) -> Result<(), SimulationError> {
        if key.shift {
            self.platform.send_virtual_key(VK_SHIFT, KeyDirection::Down)?;
        }
        self.platform.send_keys(&[key.scan], direction)?;
        if key.shift {
            self.platform.send_virtual_key(VK_SHIFT, KeyDirection::Up)?;
        }
        Ok(())
    }

    /// Shift (if needed), press, delay, release, Shift release.
    fn tap(&self, key: ResolvedKey, key_delay: Duration) -> Result<(), SimulationError> {
        if key.shift {
            self.platform.send_virtual_key(VK_SHIFT, KeyDirection::Down)?;
        }
        self.platform.send_keys(&[key.scan], KeyDirection::Down)?;
        pause(key_delay);
        self.platform.send_keys(&[key.scan], KeyDirection::Up)?;
        if key.shift {
            self.platform.send_virtual_key(VK_SHIFT, KeyDirection::Up)?;
        }
        Ok(())
    }

    // ── Mouse buttons ─────────────────────────────────────────────────────────

    /// Clicks `button` `presses` times: press, `key_delay`, release, `interval`.
    pub fn mouse_click(
        &self,
        button: MouseButton,
        presses: u32,
        interval: Duration,
        key_delay: Duration,
    ) -> Result<(), SimulationError> {
        debug!("mouse click: {button} x{presses}");
        for _ in 0..presses {
            self.platform.send_mouse_button(button, KeyDirection::Down)?;
            pause(key_delay);
            self.platform.send_mouse_button(button, KeyDirection::Up)?;
            pause(interval);
        }
        Ok(())
    }

    pub fn mouse_down(&self, button: MouseButton) -> Result<(), SimulationError> {
        self.platform.send_mouse_button(button, KeyDirection::Down)
    }

    pub fn mouse_up(&self, button: MouseButton) -> Result<(), SimulationError> {
        self.platform.send_mouse_button(button, KeyDirection::Up)
    }

    /// Presses `button` now and releases it when the guard is dropped.
    pub fn mouse_hold(&self, button: MouseButton) -> Result<MouseHold<'_>, SimulationError> {
        self.mouse_down(button)?;
        Ok(MouseHold {
            simulator: self,
            button,
            released: false,
        })
    }

    // ── Cursor ────────────────────────────────────────────────────────────────

    /// Moves the cursor to `(x, y)` along a straight line over `duration`.
    ///
    /// A `None` coordinate keeps the cursor's current value on that axis.  A
    /// duration below one path step jumps straight to the target.
    pub fn move_mouse_to(
        &self,
        x: Option<i32>,
        y: Option<i32>,
        duration: Duration,
    ) -> Result<(), SimulationError> {
        let from = self.platform.cursor_position()?;
        let to = Point::new(x.unwrap_or(from.x), y.unwrap_or(from.y));
        self.follow_path(from, to, duration)
    }

    /// Moves the cursor by `(dx, dy)` from its current position over `duration`.
    pub fn move_mouse(&self, dx: i32, dy: i32, duration: Duration) -> Result<(), SimulationError> {
        let from = self.platform.cursor_position()?;
        self.follow_path(from, from.offset(dx, dy), duration)
    }

    fn follow_path(&self, from: Point, to: Point, duration: Duration) -> Result<(), SimulationError> {
        trace!("cursor path {from:?} -> {to:?} over {duration:?}");
        for step in linear_path(from, to, duration) {
            pause(step.delay);
            self.platform.set_cursor_position(step.point)?;
        }
        Ok(())
    }

    /// Scrolls the wheel by `clicks`.  Zero sends nothing.
    pub fn scroll_mouse(&self, clicks: i32) -> Result<(), SimulationError> {
        if clicks == 0 {
            return Ok(());
        }
        self.platform.scroll_wheel(clicks)
    }

    pub fn mouse_position(&self) -> Result<Point, SimulationError> {
        self.platform.cursor_position()
    }

    pub fn display_size(&self) -> Result<Size, SimulationError> {
        self.platform.display_size()
    }
}

fn join_names<S: AsRef<str>>(keys: &[S]) -> String {
    keys.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("+")
}

// ── Hold guards ───────────────────────────────────────────────────────────────

/// Keys held down by [`InputSimulator::key_hold`].
///
/// Releases the keys, in press order, on drop.
#[must_use = "the keys are released as soon as the guard is dropped"]
pub struct KeyHold<'a> {
    simulator: &'a InputSimulator,
    keys: Vec<ResolvedKey>,
    released: bool,
}

impl KeyHold<'_> {
    /// Releases the keys now, reporting any platform error.
    pub fn release(mut self) -> Result<(), SimulationError> {
        self.released = true;
        self.simulator.send_each(&self.keys, KeyDirection::Up)
    }
}

impl Drop for KeyHold<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.simulator.send_each(&self.keys, KeyDirection::Up) {
            warn!("failed to release held keys: {e}");
        }
    }
}

/// A mouse button held down by [`InputSimulator::mouse_hold`].
#[must_use = "the button is released as soon as the guard is dropped"]
pub struct MouseHold<'a> {
    simulator: &'a InputSimulator,
    button: MouseButton,
    released: bool,
}

impl MouseHold<'_> {
    pub fn release(mut self) -> Result<(), SimulationError> {
        self.released = true;
        self.simulator.mouse_up(self.button)
    }
}

impl Drop for MouseHold<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.simulator.mouse_up(self.button) {
            warn!("failed to release {} mouse button: {e}", self.button);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
