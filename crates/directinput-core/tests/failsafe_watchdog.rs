//! Integration tests for the failsafe watchdog.
//!
//! A scripted oracle stands in for the keyboard: tests "press" and "release"
//! key names and the watchdog observes them through the public API only.
//! Hold durations are scaled down to a few hundred milliseconds and the poll
//! interval to 5 ms so the timing windows stay tight.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use directinput_core::{Failsafe, FailsafeOptions, FailsafeUpdate, KeyStateError, KeyStateOracle};

const POLL: Duration = Duration::from_millis(5);
const HOLD: Duration = Duration::from_millis(200);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ── Test doubles ──────────────────────────────────────────────────────────────

/// Keyboard whose held keys are set by the test.
#[derive(Default)]
struct ScriptedKeyboard {
    held: Mutex<HashSet<String>>,
    queries: AtomicUsize,
    panic_on_query: Mutex<bool>,
}

impl ScriptedKeyboard {
    fn press(&self, key: &str) {
        self.held.lock().unwrap().insert(key.to_string());
    }

    fn release(&self, key: &str) {
        self.held.lock().unwrap().remove(key);
    }

    fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl KeyStateOracle for ScriptedKeyboard {
    fn is_pressed(&self, keys: &[String]) -> Result<bool, KeyStateError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if *self.panic_on_query.lock().unwrap() {
            panic!("scripted keyboard failure");
        }
        let held = self.held.lock().unwrap();
        Ok(keys.iter().all(|k| held.contains(k)))
    }
}

/// Records the instant of every trigger.
#[derive(Clone, Default)]
struct FireLog(Arc<Mutex<Vec<Instant>>>);

impl FireLog {
    fn callback(&self) -> impl Fn() + Send + Sync + 'static {
        let log = Arc::clone(&self.0);
        move || log.lock().unwrap().push(Instant::now())
    }

    fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn first(&self) -> Option<Instant> {
        self.0.lock().unwrap().first().copied()
    }
}

fn start(keyboard: &Arc<ScriptedKeyboard>, keys: &[&str], hold: Duration, log: &FireLog) -> Failsafe {
    Failsafe::start(
        keyboard.clone(),
        FailsafeOptions::new()
            .trigger_keys(keys.iter().copied())
            .hold_duration(hold)
            .poll_interval(POLL)
            .on_trigger(log.callback()),
    )
    .expect("failsafe must start")
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(ms(2));
    }
    condition()
}

// ── Timing scenarios ──────────────────────────────────────────────────────────

#[test]
fn test_continuous_hold_fires_once_within_window() {
    // Arrange
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);

    // Act – hold esc for 0.25 s
    let pressed_at = Instant::now();
    keyboard.press("esc");
    thread::sleep(ms(250));
    keyboard.release("esc");

    // Assert
    assert!(wait_until(ms(200), || log.count() == 1));
    let fired_after = log.first().unwrap() - pressed_at;
    assert!(fired_after >= HOLD, "fired too early: {fired_after:?}");
    assert!(fired_after < ms(300), "fired too late: {fired_after:?}");
    assert!(failsafe.has_triggered());
    failsafe.stop();
}

#[test]
fn test_interrupted_hold_needs_full_fresh_duration() {
    // Arrange
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);

    // Act – 0.1 s press, 0.05 s release, then 0.25 s press
    let first_press = Instant::now();
    keyboard.press("esc");
    thread::sleep(ms(100));
    keyboard.release("esc");
    thread::sleep(ms(50));
    let second_press = Instant::now();
    keyboard.press("esc");
    thread::sleep(ms(250));
    keyboard.release("esc");

    // Assert – timed from the second press, not the first
    assert!(wait_until(ms(200), || log.count() == 1));
    let fired = log.first().unwrap();
    assert!(fired - second_press >= HOLD);
    assert!(fired - first_press >= ms(350));
    assert_eq!(log.count(), 1);
    failsafe.stop();
}

#[test]
fn test_configured_hold_duration_applies_to_next_streak() {
    // Arrange – start long, shorten while idle
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], Duration::from_secs(10), &log);
    failsafe.configure(FailsafeUpdate::new().hold_duration(ms(300)));

    // Act – hold just short of the new duration
    keyboard.press("esc");
    thread::sleep(ms(260));
    keyboard.release("esc");
    thread::sleep(ms(50));

    // Assert – not yet
    assert_eq!(log.count(), 0);

    // Act – hold for the full duration
    let pressed_at = Instant::now();
    keyboard.press("esc");

    // Assert
    assert!(wait_until(ms(600), || log.count() == 1));
    assert!(log.first().unwrap() - pressed_at >= ms(300));
    assert_eq!(failsafe.hold_duration(), ms(300));
    failsafe.stop();
}

#[test]
fn test_shortening_hold_mid_hold_needs_full_new_duration() {
    // Arrange – a long hold, already 0.3 s into a streak
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], Duration::from_secs(5), &log);
    keyboard.press("esc");
    thread::sleep(ms(300));

    // Act – shorten below the time already held
    let reconfigured_at = Instant::now();
    failsafe.configure(FailsafeUpdate::new().hold_duration(HOLD));
    thread::sleep(ms(150));

    // Assert – time held under the old duration does not count
    assert_eq!(log.count(), 0, "fired on time held before the reconfigure");
    assert!(wait_until(ms(500), || log.count() == 1));
    assert!(log.first().unwrap() - reconfigured_at >= HOLD);
    failsafe.stop();
}

// ── Properties ────────────────────────────────────────────────────────────────

#[test]
fn test_enable_and_disable_are_idempotent() {
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);

    failsafe.disable();
    failsafe.disable();
    assert!(!failsafe.is_enabled());

    failsafe.enable();
    failsafe.enable();
    assert!(failsafe.is_enabled());
    assert!(failsafe.is_running());

    failsafe.stop();
}

#[test]
fn test_disable_mid_hold_discards_accumulated_time() {
    // Arrange
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);

    // Act – hold 150 ms, disable, re-enable while still holding
    keyboard.press("esc");
    thread::sleep(ms(150));
    failsafe.disable();
    thread::sleep(ms(30));
    let enabled_at = Instant::now();
    failsafe.enable();
    thread::sleep(ms(150));

    // Assert – 150 ms after re-enabling is not enough
    assert_eq!(log.count(), 0);

    // Assert – a full duration after re-enabling is
    assert!(wait_until(ms(300), || log.count() == 1));
    assert!(log.first().unwrap() - enabled_at >= HOLD);
    failsafe.stop();
}

#[test]
fn test_disabled_failsafe_never_triggers() {
    // Arrange
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = Failsafe::start(
        keyboard.clone(),
        FailsafeOptions::new()
            .hold_duration(ms(20))
            .poll_interval(POLL)
            .enabled(false)
            .on_trigger(log.callback()),
    )
    .unwrap();

    // Act
    keyboard.press("esc");
    thread::sleep(ms(150));

    // Assert
    assert_eq!(log.count(), 0);
    assert!(!failsafe.has_triggered());
    failsafe.stop();
}

#[test]
fn test_fires_at_most_once_while_held_indefinitely() {
    // Arrange
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], ms(30), &log);

    // Act
    keyboard.press("esc");
    thread::sleep(ms(300));

    // Assert
    assert_eq!(log.count(), 1);
    assert!(wait_until(ms(500), || !failsafe.is_running()));
}

#[test]
fn test_changing_trigger_keys_mid_hold_starts_a_new_streak() {
    // Arrange – esc and f12 both held
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);
    keyboard.press("esc");
    keyboard.press("f12");
    thread::sleep(ms(150));

    // Act – switch to f12 while it is already held
    let reconfigured_at = Instant::now();
    failsafe.configure(FailsafeUpdate::new().trigger_keys(["F12"]));
    thread::sleep(ms(100));

    // Assert – the esc streak did not carry over
    assert_eq!(log.count(), 0);
    assert!(wait_until(ms(300), || log.count() == 1));
    assert!(log.first().unwrap() - reconfigured_at >= HOLD);
    assert_eq!(failsafe.trigger_keys(), vec!["f12"]);
    failsafe.stop();
}

#[test]
fn test_combination_requires_every_key() {
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["ctrl", "shift", "q"], ms(30), &log);

    keyboard.press("ctrl");
    keyboard.press("q");
    thread::sleep(ms(120));
    assert_eq!(log.count(), 0);

    keyboard.press("shift");
    assert!(wait_until(ms(300), || log.count() == 1));
    failsafe.stop();
}

#[test]
fn test_unknown_trigger_key_is_never_pressed() {
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["no-such-key"], ms(20), &log);

    keyboard.press("esc");
    thread::sleep(ms(120));

    assert_eq!(log.count(), 0);
    assert!(keyboard.queries() > 0);
    failsafe.stop();
}

// ── Callbacks ─────────────────────────────────────────────────────────────────

#[test]
fn test_configured_callback_replaces_previous() {
    // Arrange
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let old = FireLog::default();
    let new = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], ms(30), &old);

    // Act
    failsafe.configure(FailsafeUpdate::new().on_trigger(new.callback()));
    keyboard.press("esc");

    // Assert
    assert!(wait_until(ms(300), || new.count() == 1));
    assert_eq!(old.count(), 0);
    failsafe.stop();
}

#[test]
fn test_stop_from_inside_callback_does_not_deadlock() {
    // Arrange – the callback stops its own watchdog
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let slot: Arc<Mutex<Option<Failsafe>>> = Arc::new(Mutex::new(None));
    let stopped_in_callback = Arc::new(AtomicUsize::new(0));

    let callback_slot = Arc::clone(&slot);
    let callback_count = Arc::clone(&stopped_in_callback);
    let failsafe = Failsafe::start(
        keyboard.clone(),
        FailsafeOptions::new()
            .hold_duration(ms(20))
            .poll_interval(POLL)
            .on_trigger(move || {
                if let Some(fs) = callback_slot.lock().unwrap().as_ref() {
                    fs.stop();
                }
                callback_count.fetch_add(1, Ordering::SeqCst);
            }),
    )
    .unwrap();
    *slot.lock().unwrap() = Some(failsafe.clone());

    // Act
    keyboard.press("esc");

    // Assert
    assert!(wait_until(ms(500), || stopped_in_callback.load(Ordering::SeqCst) == 1));
    assert!(wait_until(ms(500), || !failsafe.is_running()));
    failsafe.stop();
    slot.lock().unwrap().take();
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn test_stop_ends_key_queries() {
    // Arrange
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);
    thread::sleep(ms(30));

    // Act
    failsafe.stop();
    let after_stop = keyboard.queries();
    keyboard.press("esc");
    thread::sleep(ms(300));

    // Assert
    assert_eq!(keyboard.queries(), after_stop);
    assert_eq!(log.count(), 0);
    assert!(!failsafe.is_running());
}

#[test]
fn test_dropping_last_handle_stops_polling() {
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);
    thread::sleep(ms(30));

    drop(failsafe);
    thread::sleep(ms(50));
    let settled = keyboard.queries();
    thread::sleep(ms(100));

    assert_eq!(keyboard.queries(), settled);
}

#[test]
fn test_panicking_oracle_is_treated_as_released() {
    // Arrange
    let keyboard = Arc::new(ScriptedKeyboard::default());
    *keyboard.panic_on_query.lock().unwrap() = true;
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], ms(20), &log);
    keyboard.press("esc");

    // Act
    thread::sleep(ms(80));
    let during_panics = keyboard.queries();
    *keyboard.panic_on_query.lock().unwrap() = false;

    // Assert – still polling, nothing fired while panicking
    assert!(during_panics >= 2);
    assert_eq!(log.count(), 0);
    assert!(wait_until(ms(300), || log.count() == 1));
    failsafe.stop();
}

#[test]
fn test_callback_holding_weak_handle_lets_drop_stop_polling() {
    // Arrange – the callback reaches its watchdog through a weak handle
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);
    let weak = failsafe.downgrade();
    let observer = failsafe.downgrade();
    failsafe.configure(FailsafeUpdate::new().on_trigger(move || {
        if let Some(fs) = weak.upgrade() {
            fs.stop();
        }
    }));
    thread::sleep(ms(30));

    // Act
    drop(failsafe);
    thread::sleep(ms(50));
    let settled = keyboard.queries();
    thread::sleep(ms(100));

    // Assert
    assert_eq!(keyboard.queries(), settled);
    assert!(observer.upgrade().is_none());
}

#[test]
fn test_callback_holding_strong_handle_keeps_polling_until_stopped() {
    // Arrange – the callback owns a strong handle
    let keyboard = Arc::new(ScriptedKeyboard::default());
    let log = FireLog::default();
    let failsafe = start(&keyboard, &["esc"], HOLD, &log);
    let captured = failsafe.clone();
    failsafe.configure(FailsafeUpdate::new().on_trigger(move || captured.stop()));
    let observer = failsafe.downgrade();

    // Act – dropping the caller's handle does not stop it
    drop(failsafe);
    thread::sleep(ms(30));
    let after_drop = keyboard.queries();
    assert!(wait_until(ms(300), || keyboard.queries() > after_drop + 3));

    // Assert – an explicit stop does
    let handle = observer.upgrade().expect("callback keeps the watchdog alive");
    handle.stop();
    let after_stop = keyboard.queries();
    thread::sleep(ms(50));
    assert_eq!(keyboard.queries(), after_stop);
    assert!(!handle.is_running());
}

#[test]
fn test_is_running_while_detached_callback_still_runs() {
    // Arrange – a callback that blocks until the test releases it
    let keyboard = Arc::new(ScriptedKeyboard::default());
    keyboard.press("esc");
    let (entered_tx, entered_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let entered_tx = Mutex::new(entered_tx);
    let release_rx = Mutex::new(release_rx);
    let failsafe = Failsafe::start(
        keyboard.clone(),
        FailsafeOptions::new()
            .hold_duration(Duration::ZERO)
            .poll_interval(POLL)
            .on_trigger(move || {
                entered_tx.lock().unwrap().send(()).ok();
                release_rx.lock().unwrap().recv_timeout(Duration::from_secs(5)).ok();
            }),
    )
    .unwrap();
    entered_rx
        .recv_timeout(Duration::from_secs(1))
        .expect("callback must start");

    // Act – stop gives up waiting and detaches the thread
    failsafe.stop();

    // Assert
    assert!(failsafe.is_running(), "detached thread is still alive");
    release_tx.send(()).unwrap();
    assert!(wait_until(ms(500), || !failsafe.is_running()));
}
