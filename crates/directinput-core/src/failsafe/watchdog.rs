//! The [`Failsafe`] handle and its polling thread.
//!
//! # Threading model
//!
//! One dedicated thread (`directinput-failsafe`) runs the poll loop.  It shares
//! a [`WatchdogConfig`] with the handle through a `Mutex`; every poll takes a
//! [`ConfigSnapshot`] under the lock and releases it before calling the oracle,
//! so a slow oracle never blocks `configure()` and a trigger callback may call
//! back into the handle freely.
//!
//! The loop sleeps with `Receiver::recv_timeout` on a stop channel instead of
//! `thread::sleep`.  Dropping the sender (in [`Failsafe::stop`] or when the last
//! handle is dropped) wakes the loop immediately.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::config::{ConfigSnapshot, FailsafeOptions, FailsafeUpdate, WatchdogConfig};
use super::hold::{HoldStep, HoldTracker};
use super::oracle::KeyStateOracle;
use super::terminate::{terminate_process, FAILSAFE_EXIT_CODE};
use super::FailsafeError;

/// Upper bound on how long [`Failsafe::stop`] waits for the thread to exit.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// How often `stop()` checks whether the thread has finished.
const JOIN_POLL: Duration = Duration::from_millis(5);

/// State shared with the polling thread.
struct Shared {
    config: Mutex<WatchdogConfig>,
    stopped: AtomicBool,
    triggered: AtomicBool,
    /// Set by the polling thread as it exits, including by unwinding.
    finished: AtomicBool,
}

impl Shared {
    fn config(&self) -> MutexGuard<'_, WatchdogConfig> {
        // The config has no cross-field invariant a panicking writer could break.
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Inner {
    shared: Arc<Shared>,
    stop_tx: Mutex<Option<Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        // The sender field drops right after this, waking the thread.
        self.shared.stopped.store(true, Ordering::SeqCst);
    }
}

/// A running failsafe watchdog.
///
/// Cloning yields another handle to the same watchdog.  The polling thread
/// stops when [`stop`](Failsafe::stop) is called, when the failsafe fires, or
/// when the last handle is dropped.
///
/// # Handles inside the trigger callback
///
/// The callback is owned by the watchdog, so a `Failsafe` captured by it keeps
/// the watchdog alive: dropping every other handle no longer stops polling,
/// and the callback owner must call [`stop`](Failsafe::stop) itself.  Capture
/// a [`WeakFailsafe`] from [`downgrade`](Failsafe::downgrade) instead to keep
/// drop-to-stop working.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use directinput_core::{Failsafe, FailsafeOptions, KeyStateError, KeyStateOracle};
///
/// struct NeverPressed;
///
/// impl KeyStateOracle for NeverPressed {
///     fn is_pressed(&self, _keys: &[String]) -> Result<bool, KeyStateError> {
///         Ok(false)
///     }
/// }
///
/// let failsafe = Failsafe::start(
///     Arc::new(NeverPressed),
///     FailsafeOptions::new()
///         .trigger_keys(["f12"])
///         .hold_duration(Duration::from_secs(2))
///         .on_trigger(|| eprintln!("failsafe!")),
/// )
/// .unwrap();
///
/// failsafe.disable();
/// assert!(!failsafe.is_enabled());
/// failsafe.stop();
/// assert!(!failsafe.is_running());
/// ```
#[derive(Clone)]
pub struct Failsafe {
    inner: Arc<Inner>,
}

impl Failsafe {
    /// Validates `options` and spawns the polling thread.  Does not block.
    ///
    /// # Errors
    ///
    /// Returns [`FailsafeError::EmptyTriggerKeys`] or
    /// [`FailsafeError::ZeroPollInterval`] for invalid options, and
    /// [`FailsafeError::Spawn`] if the thread cannot be created.
    pub fn start(
        oracle: Arc<dyn KeyStateOracle>,
        options: FailsafeOptions,
    ) -> Result<Self, FailsafeError> {
        options.validate()?;

        let config = WatchdogConfig::from_options(options);
        info!(
            "failsafe armed: hold {} for {:?} to abort",
            config.trigger_keys.join("+"),
            config.hold_duration
        );

        let shared = Arc::new(Shared {
            config: Mutex::new(config),
            stopped: AtomicBool::new(false),
            triggered: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        });
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("directinput-failsafe".to_string())
            .spawn(move || {
                let _finished = FinishedGuard(&worker_shared);
                run(&worker_shared, oracle.as_ref(), &stop_rx);
            })?;

        Ok(Self {
            inner: Arc::new(Inner {
                shared,
                stop_tx: Mutex::new(Some(stop_tx)),
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    /// Lets hold time accumulate again.  A new streak starts from zero.
    pub fn enable(&self) {
        self.inner.shared.config().set_enabled(true);
        info!("failsafe enabled");
    }

    /// Stops hold time from accumulating and discards any running streak.
    pub fn disable(&self) {
        self.inner.shared.config().set_enabled(false);
        info!("failsafe disabled");
    }

    /// Applies the supplied fields of `update` atomically.
    ///
    /// Changing the trigger keys or the hold duration discards any running
    /// streak.  An empty key list is ignored.
    pub fn configure(&self, update: FailsafeUpdate) {
        let (keys, hold) = {
            let mut config = self.inner.shared.config();
            config.apply(update);
            (config.trigger_keys.join("+"), config.hold_duration)
        };
        info!("failsafe configured: keys={keys}, hold={hold:?}");
    }

    /// Stops the polling thread and waits up to [`STOP_TIMEOUT`] for it to exit.
    ///
    /// Idempotent, callable from any thread, including from inside the trigger
    /// callback (in which case it does not wait).
    pub fn stop(&self) {
        if self.inner.shared.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        drop(lock(&self.inner.stop_tx).take());

        let Some(handle) = lock(&self.inner.worker).take() else {
            return;
        };
        if handle.thread().id() == thread::current().id() {
            debug!("failsafe stop requested from its own thread");
            return;
        }
        join_with_timeout(handle, STOP_TIMEOUT);
        info!("failsafe stopped");
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.shared.config().enabled
    }

    pub fn trigger_keys(&self) -> Vec<String> {
        self.inner.shared.config().trigger_keys.clone()
    }

    pub fn hold_duration(&self) -> Duration {
        self.inner.shared.config().hold_duration
    }

    pub fn poll_interval(&self) -> Duration {
        self.inner.shared.config().poll_interval
    }

    /// `true` once the trigger action has been started.
    pub fn has_triggered(&self) -> bool {
        self.inner.shared.triggered.load(Ordering::SeqCst)
    }

    /// `true` while the polling thread (or a trigger callback on it) is alive,
    /// including after `stop()` gave up waiting and detached it.
    pub fn is_running(&self) -> bool {
        !self.inner.shared.finished.load(Ordering::SeqCst)
    }

    /// Returns a handle that does not keep the watchdog alive.
    pub fn downgrade(&self) -> WeakFailsafe {
        WeakFailsafe {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// A non-owning handle to a [`Failsafe`], for use inside its own trigger
/// callback.
#[derive(Clone)]
pub struct WeakFailsafe {
    inner: Weak<Inner>,
}

impl WeakFailsafe {
    /// Returns a strong handle, or `None` once every [`Failsafe`] is dropped.
    pub fn upgrade(&self) -> Option<Failsafe> {
        self.inner.upgrade().map(|inner| Failsafe { inner })
    }
}

struct FinishedGuard<'a>(&'a Shared);

impl Drop for FinishedGuard<'_> {
    fn drop(&mut self) {
        self.0.finished.store(true, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn join_with_timeout(handle: JoinHandle<()>, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            warn!("failsafe thread did not exit within {timeout:?}; detaching it");
            return;
        }
        thread::sleep(JOIN_POLL);
    }
    if handle.join().is_err() {
        warn!("failsafe thread panicked");
    }
}

/// Thread entry point: poll until stopped or triggered, then fire.
fn run(shared: &Shared, oracle: &dyn KeyStateOracle, stop_rx: &Receiver<()>) {
    if let Some((snapshot, held)) = poll_until_triggered(shared, oracle, stop_rx) {
        fire(snapshot, held);
    }
    debug!("failsafe poll loop exited");
}

fn poll_until_triggered(
    shared: &Shared,
    oracle: &dyn KeyStateOracle,
    stop_rx: &Receiver<()>,
) -> Option<(ConfigSnapshot, Duration)> {
    let mut tracker = HoldTracker::new();
    let mut seen_epoch = None;

    loop {
        if shared.stopped.load(Ordering::SeqCst) {
            return None;
        }

        let snapshot = shared.config().snapshot();
        if seen_epoch != Some(snapshot.streak_epoch) {
            if tracker.hold_started_at().is_some() {
                debug!("failsafe hold streak discarded after reconfiguration");
            }
            tracker.reset();
            seen_epoch = Some(snapshot.streak_epoch);
        }

        if snapshot.enabled {
            let pressed = query_oracle(oracle, &snapshot.trigger_keys);
            match tracker.observe(pressed, Instant::now(), snapshot.hold_duration) {
                HoldStep::Started => info!(
                    "failsafe: holding {} detected; hold for {:?} to trigger",
                    snapshot.trigger_keys.join("+"),
                    snapshot.hold_duration
                ),
                HoldStep::Released(held) => debug!("failsafe hold released after {held:?}"),
                HoldStep::Elapsed(held) => {
                    if still_current(shared, &snapshot)
                        && !shared.triggered.swap(true, Ordering::SeqCst)
                    {
                        return Some((snapshot, held));
                    }
                    // Reconfigured mid-poll; the streak belonged to the old keys.
                    tracker = HoldTracker::new();
                }
                HoldStep::Idle | HoldStep::Holding(_) | HoldStep::Spent => {}
            }
        } else {
            tracker.reset();
        }

        match stop_rx.recv_timeout(snapshot.poll_interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return None,
        }
    }
}

/// Asks the oracle, mapping errors and panics to "not pressed".
fn query_oracle(oracle: &dyn KeyStateOracle, keys: &[String]) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| oracle.is_pressed(keys))) {
        Ok(Ok(pressed)) => pressed,
        Ok(Err(e)) => {
            debug!("key state query failed, treating as released: {e}");
            false
        }
        Err(_) => {
            warn!("key state oracle panicked, treating as released");
            false
        }
    }
}

/// Re-checks, under the lock, that nothing invalidated the streak since `snapshot`.
fn still_current(shared: &Shared, snapshot: &ConfigSnapshot) -> bool {
    let config = shared.config();
    !shared.stopped.load(Ordering::SeqCst)
        && config.enabled
        && config.streak_epoch == snapshot.streak_epoch
}

fn fire(snapshot: ConfigSnapshot, held: Duration) {
    warn!(
        "FAILSAFE TRIGGERED: {} held for {held:?}",
        snapshot.trigger_keys.join("+")
    );
    match snapshot.on_trigger {
        Some(callback) => callback(),
        None => terminate_process(FAILSAFE_EXIT_CODE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failsafe::oracle::{KeyStateError, MockKeyStateOracle};
    use std::sync::atomic::AtomicUsize;

    const FAST_POLL: Duration = Duration::from_millis(5);

    fn counting_callback() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_oracle_errors_are_treated_as_released() {
        // Arrange – an oracle that always fails
        let mut mock = MockKeyStateOracle::new();
        mock.expect_is_pressed()
            .times(3..)
            .returning(|_| Err(KeyStateError::Platform("device lost".to_string())));
        let oracle = Arc::new(mock);
        let (fired, callback) = counting_callback();

        // Act
        let failsafe = Failsafe::start(
            oracle.clone(),
            FailsafeOptions::new()
                .hold_duration(Duration::ZERO)
                .poll_interval(FAST_POLL)
                .on_trigger(callback),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(100));
        failsafe.stop();

        // Assert – polling continued and nothing fired
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!failsafe.has_triggered());
    }

    #[test]
    fn test_oracle_receives_normalized_trigger_keys() {
        // Arrange
        let mut mock = MockKeyStateOracle::new();
        mock.expect_is_pressed()
            .withf(|keys: &[String]| keys.len() == 2 && keys[0] == "ctrl" && keys[1] == "f12")
            .times(1..)
            .returning(|_| Ok(false));
        let oracle = Arc::new(mock);

        // Act
        let failsafe = Failsafe::start(
            oracle.clone(),
            FailsafeOptions::new()
                .trigger_keys(["Ctrl", "F12"])
                .poll_interval(FAST_POLL)
                .on_trigger(|| {}),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(50));
        failsafe.stop();

        // Assert
        assert_eq!(failsafe.trigger_keys(), vec!["ctrl", "f12"]);
    }

    #[test]
    fn test_start_rejects_empty_trigger_keys() {
        let oracle = Arc::new(MockKeyStateOracle::new());
        let result = Failsafe::start(
            oracle,
            FailsafeOptions::new().trigger_keys(Vec::<String>::new()),
        );
        assert!(matches!(result, Err(FailsafeError::EmptyTriggerKeys)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut mock = MockKeyStateOracle::new();
        mock.expect_is_pressed().returning(|_| Ok(false));
        let failsafe = Failsafe::start(
            Arc::new(mock),
            FailsafeOptions::new().poll_interval(FAST_POLL).on_trigger(|| {}),
        )
        .unwrap();

        failsafe.stop();
        failsafe.stop();
        failsafe.clone().stop();

        assert!(!failsafe.is_running());
    }

    #[test]
    fn test_stop_wakes_thread_without_waiting_for_poll_interval() {
        // Arrange – a very long poll interval
        let mut mock = MockKeyStateOracle::new();
        mock.expect_is_pressed().returning(|_| Ok(false));
        let failsafe = Failsafe::start(
            Arc::new(mock),
            FailsafeOptions::new()
                .poll_interval(Duration::from_secs(60))
                .on_trigger(|| {}),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(20));

        // Act
        let begin = Instant::now();
        failsafe.stop();

        // Assert
        assert!(begin.elapsed() < STOP_TIMEOUT);
        assert!(!failsafe.is_running());
    }
}
