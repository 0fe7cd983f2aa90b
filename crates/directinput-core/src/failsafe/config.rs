//! Failsafe construction options and runtime updates.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::FailsafeError;

/// Action run once when the failsafe fires.
///
/// Runs on the failsafe's polling thread after the loop has finished.  Any
/// panic inside it is the caller's concern.
pub type TriggerCallback = Arc<dyn Fn() + Send + Sync>;

/// Key held by default to trigger the failsafe.
pub const DEFAULT_TRIGGER_KEY: &str = "esc";

/// Default continuous hold time before the failsafe fires.
pub const DEFAULT_HOLD_DURATION: Duration = Duration::from_secs(5);

/// Default delay between two key-state polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Converts a hold time in seconds, rejecting negative, NaN, and overflowing values.
pub fn hold_duration_from_secs(secs: f64) -> Result<Duration, FailsafeError> {
    Duration::try_from_secs_f64(secs).map_err(|_| FailsafeError::InvalidHoldDuration(secs))
}

/// Options for [`Failsafe::start`](super::Failsafe::start).
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use directinput_core::FailsafeOptions;
///
/// let options = FailsafeOptions::new()
///     .trigger_keys(["ctrl", "alt"])
///     .hold_duration(Duration::from_secs(3));
/// assert_eq!(options.trigger_keys, vec!["ctrl", "alt"]);
/// assert!(options.on_trigger.is_none());
/// ```
#[derive(Clone)]
pub struct FailsafeOptions {
    /// Keys that must all be held at once.
    pub trigger_keys: Vec<String>,
    /// Continuous hold time required to fire.
    pub hold_duration: Duration,
    /// Action to run on trigger.  `None` terminates the process.
    pub on_trigger: Option<TriggerCallback>,
    /// Whether hold time accumulates from the start.
    pub enabled: bool,
    /// Delay between two key-state polls.
    pub poll_interval: Duration,
}

impl Default for FailsafeOptions {
    /// Esc held for five seconds, polled every 100 ms, terminating the process.
    fn default() -> Self {
        Self {
            trigger_keys: vec![DEFAULT_TRIGGER_KEY.to_string()],
            hold_duration: DEFAULT_HOLD_DURATION,
            on_trigger: None,
            enabled: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl fmt::Debug for FailsafeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailsafeOptions")
            .field("trigger_keys", &self.trigger_keys)
            .field("hold_duration", &self.hold_duration)
            .field("on_trigger", &self.on_trigger.is_some())
            .field("enabled", &self.enabled)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl FailsafeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn hold_duration(mut self, hold: Duration) -> Self {
        self.hold_duration = hold;
        self
    }

    /// Sets the hold time in (fractional) seconds.
    ///
    /// # Errors
    ///
    /// Returns [`FailsafeError::InvalidHoldDuration`] for negative or NaN values.
    pub fn hold_seconds(mut self, secs: f64) -> Result<Self, FailsafeError> {
        self.hold_duration = hold_duration_from_secs(secs)?;
        Ok(self)
    }

    pub fn on_trigger<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_trigger = Some(Arc::new(callback));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), FailsafeError> {
        if self.trigger_keys.is_empty() {
            return Err(FailsafeError::EmptyTriggerKeys);
        }
        if self.poll_interval.is_zero() {
            return Err(FailsafeError::ZeroPollInterval);
        }
        Ok(())
    }
}

/// A partial reconfiguration: only the `Some` fields change.
#[derive(Clone, Default)]
pub struct FailsafeUpdate {
    pub trigger_keys: Option<Vec<String>>,
    pub hold_duration: Option<Duration>,
    pub on_trigger: Option<TriggerCallback>,
}

impl fmt::Debug for FailsafeUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailsafeUpdate")
            .field("trigger_keys", &self.trigger_keys)
            .field("hold_duration", &self.hold_duration)
            .field("on_trigger", &self.on_trigger.is_some())
            .finish()
    }
}

impl FailsafeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn hold_duration(mut self, hold: Duration) -> Self {
        self.hold_duration = Some(hold);
        self
    }

    pub fn on_trigger<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_trigger = Some(Arc::new(callback));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.trigger_keys.is_none() && self.hold_duration.is_none() && self.on_trigger.is_none()
    }
}

/// Live configuration shared between the [`Failsafe`](super::Failsafe) handle and
/// its polling thread.
///
/// `streak_epoch` increments whenever a running hold streak must be thrown
/// away (disable, trigger-key change, hold-duration change).  The loop compares it on every poll, so
/// a disable/enable pair that lands between two polls still resets the streak.
pub(crate) struct WatchdogConfig {
    pub(crate) trigger_keys: Vec<String>,
    pub(crate) hold_duration: Duration,
    pub(crate) on_trigger: Option<TriggerCallback>,
    pub(crate) enabled: bool,
    pub(crate) poll_interval: Duration,
    pub(crate) streak_epoch: u64,
}

/// A consistent copy of [`WatchdogConfig`] taken under the lock.
#[derive(Clone)]
pub(crate) struct ConfigSnapshot {
    pub(crate) trigger_keys: Vec<String>,
    pub(crate) hold_duration: Duration,
    pub(crate) on_trigger: Option<TriggerCallback>,
    pub(crate) enabled: bool,
    pub(crate) poll_interval: Duration,
    pub(crate) streak_epoch: u64,
}

impl WatchdogConfig {
    pub(crate) fn from_options(options: FailsafeOptions) -> Self {
        Self {
            trigger_keys: normalize_keys(options.trigger_keys),
            hold_duration: options.hold_duration,
            on_trigger: options.on_trigger,
            enabled: options.enabled,
            poll_interval: options.poll_interval,
            streak_epoch: 0,
        }
    }

    pub(crate) fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            trigger_keys: self.trigger_keys.clone(),
            hold_duration: self.hold_duration,
            on_trigger: self.on_trigger.clone(),
            enabled: self.enabled,
            poll_interval: self.poll_interval,
            streak_epoch: self.streak_epoch,
        }
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.streak_epoch = self.streak_epoch.wrapping_add(1);
        }
        self.enabled = enabled;
    }

    /// Applies the `Some` fields of `update`.
    pub(crate) fn apply(&mut self, update: FailsafeUpdate) {
        if let Some(keys) = update.trigger_keys {
            if keys.is_empty() {
                warn!("ignoring empty failsafe trigger key list");
            } else {
                self.trigger_keys = normalize_keys(keys);
                self.streak_epoch = self.streak_epoch.wrapping_add(1);
            }
        }
        if let Some(hold) = update.hold_duration {
            if hold != self.hold_duration {
                self.hold_duration = hold;
                self.streak_epoch = self.streak_epoch.wrapping_add(1);
            }
        }
        if let Some(callback) = update.on_trigger {
            self.on_trigger = Some(callback);
        }
    }
}

fn normalize_keys(keys: Vec<String>) -> Vec<String> {
    keys.into_iter().map(|k| k.to_ascii_lowercase()).collect()
}
