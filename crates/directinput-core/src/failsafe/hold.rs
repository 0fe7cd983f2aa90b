//! Hold-streak state machine.
//!
//! [`HoldTracker`] is the polling loop's private state, pulled out so the
//! timing rules can be tested with synthetic [`Instant`]s instead of sleeps.

use std::time::{Duration, Instant};

/// Outcome of feeding one poll result into a [`HoldTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldStep {
    /// Not pressed, and no streak was running.
    Idle,
    /// The combination just became fully pressed; a new streak begins.
    Started,
    /// Still pressed; the streak has lasted this long so far.
    Holding(Duration),
    /// The streak reached the hold duration.  Returned at most once per tracker.
    Elapsed(Duration),
    /// The combination was released after being held this long.
    Released(Duration),
    /// The tracker has already fired; further observations are ignored.
    Spent,
}

/// Tracks how long the trigger combination has been continuously held.
#[derive(Debug, Default)]
pub struct HoldTracker {
    hold_started_at: Option<Instant>,
    triggered: bool,
}

impl HoldTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one poll result observed at `now`.
    ///
    /// The first pressed observation only starts the streak; the trigger can
    /// fire on a later observation once `now - start >= hold`.
    pub fn observe(&mut self, pressed: bool, now: Instant, hold: Duration) -> HoldStep {
        if self.triggered {
            return HoldStep::Spent;
        }

        match (pressed, self.hold_started_at) {
            (true, None) => {
                self.hold_started_at = Some(now);
                HoldStep::Started
            }
            (true, Some(start)) => {
                let held = now.saturating_duration_since(start);
                if held >= hold {
                    self.triggered = true;
                    self.hold_started_at = None;
                    HoldStep::Elapsed(held)
                } else {
                    HoldStep::Holding(held)
                }
            }
            (false, Some(start)) => {
                self.hold_started_at = None;
                HoldStep::Released(now.saturating_duration_since(start))
            }
            (false, None) => HoldStep::Idle,
        }
    }

    /// Abandons any running streak.  Does not clear the triggered state.
    pub fn reset(&mut self) {
        self.hold_started_at = None;
    }

    /// When the current streak began, if one is running.
    pub fn hold_started_at(&self) -> Option<Instant> {
        self.hold_started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_millis(200);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_press_starts_streak_without_firing() {
        // Arrange
        let mut tracker = HoldTracker::new();
        let t0 = Instant::now();

        // Act
        let step = tracker.observe(true, t0, HOLD);

        // Assert
        assert_eq!(step, HoldStep::Started);
        assert_eq!(tracker.hold_started_at(), Some(t0));
    }

    #[test]
    fn test_fires_once_hold_duration_reached() {
        let mut tracker = HoldTracker::new();
        let t0 = Instant::now();

        tracker.observe(true, t0, HOLD);
        assert_eq!(tracker.observe(true, t0 + ms(100), HOLD), HoldStep::Holding(ms(100)));
        assert_eq!(tracker.observe(true, t0 + ms(200), HOLD), HoldStep::Elapsed(ms(200)));
        assert_eq!(tracker.observe(true, t0 + ms(300), HOLD), HoldStep::Spent);
    }

    #[test]
    fn test_fires_at_most_once_while_still_held() {
        // Arrange
        let mut tracker = HoldTracker::new();
        let t0 = Instant::now();
        tracker.observe(true, t0, HOLD);
        tracker.observe(true, t0 + ms(250), HOLD);

        // Act – keep holding for a long time
        let later: Vec<HoldStep> = (3..50)
            .map(|i| tracker.observe(true, t0 + ms(100 * i), HOLD))
            .collect();

        // Assert
        assert!(later.iter().all(|s| *s == HoldStep::Spent));
    }

    #[test]
    fn test_release_resets_streak_with_no_partial_credit() {
        // Arrange – hold for just under the duration, then release
        let mut tracker = HoldTracker::new();
        let t0 = Instant::now();
        tracker.observe(true, t0, HOLD);
        tracker.observe(true, t0 + ms(190), HOLD);
        assert_eq!(tracker.observe(false, t0 + ms(195), HOLD), HoldStep::Released(ms(195)));

        // Act – press again
        let restart = t0 + ms(200);
        assert_eq!(tracker.observe(true, restart, HOLD), HoldStep::Started);

        // Assert – the new streak needs its own full duration
        assert_eq!(
            tracker.observe(true, restart + ms(190), HOLD),
            HoldStep::Holding(ms(190))
        );
        assert_eq!(
            tracker.observe(true, restart + ms(200), HOLD),
            HoldStep::Elapsed(ms(200))
        );
    }

    #[test]
    fn test_reset_discards_running_streak() {
        let mut tracker = HoldTracker::new();
        let t0 = Instant::now();
        tracker.observe(true, t0, HOLD);

        tracker.reset();

        assert_eq!(tracker.hold_started_at(), None);
        assert_eq!(tracker.observe(true, t0 + ms(500), HOLD), HoldStep::Started);
    }

    #[test]
    fn test_zero_hold_fires_on_second_observation() {
        let mut tracker = HoldTracker::new();
        let t0 = Instant::now();

        assert_eq!(tracker.observe(true, t0, Duration::ZERO), HoldStep::Started);
        assert_eq!(
            tracker.observe(true, t0, Duration::ZERO),
            HoldStep::Elapsed(Duration::ZERO)
        );
    }

    #[test]
    fn test_idle_when_never_pressed() {
        let mut tracker = HoldTracker::new();
        assert_eq!(tracker.observe(false, Instant::now(), HOLD), HoldStep::Idle);
    }
}
