use chrono::{DateTime, Utc};
use serde::Serialize;

/// Countdown state of a single quiz.
///
/// A quiz is either not yet started (`started_at` is absent) or started. The only transition is
/// [`Timer::start`], which fires at most once. Before the start, adjustments rewrite the configured
/// duration. After the start, they accumulate into a separate signed offset so that the elapsed
/// time never has to be rebased.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Timer {
    /// Configured duration in seconds. Frozen once the quiz has started.
    #[serde(rename = "timer")]
    base: u64,
    /// Signed seconds added or removed after the quiz has started. May go arbitrarily negative.
    adjustment: i64,
    /// The instant at which the quiz was started.
    started_at: Option<DateTime<Utc>>,
}

/// Floors `secs` at zero and saturates at the top of the `u64` range.
fn clamp(secs: i128) -> u64 {
    u64::try_from(secs.max(0)).unwrap_or(u64::MAX)
}

impl Timer {
    /// Creates a timer that has not yet started. Negative durations are clamped to zero.
    pub fn new(seconds: i64) -> Self {
        Self { base: u64::try_from(seconds).unwrap_or(0), ..Default::default() }
    }

    pub const fn base(&self) -> u64 {
        self.base
    }

    pub const fn adjustment(&self) -> i64 {
        self.adjustment
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub const fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whole seconds between the start and `now`, truncated toward zero. Zero if not started.
    ///
    /// A wall clock that jumps backwards yields a negative value. This is not corrected.
    pub fn elapsed(&self, now: DateTime<Utc>) -> i64 {
        self.started_at.map_or(0, |start| (now - start).num_seconds())
    }

    /// Remaining seconds at `now`. Never negative.
    pub fn time_left(&self, now: DateTime<Utc>) -> u64 {
        let total = i128::from(self.base) + i128::from(self.adjustment);
        clamp(total - i128::from(self.elapsed(now)))
    }

    /// Starts the countdown at `now` unless it is already running, in which case the original
    /// start instant is kept. Returns the remaining seconds either way.
    pub fn start(&mut self, now: DateTime<Utc>) -> u64 {
        self.started_at.get_or_insert(now);
        self.time_left(now)
    }

    /// Shifts the countdown by `delta` seconds and returns the remaining seconds at `now`.
    ///
    /// Before the start, the configured duration absorbs the delta and is clamped at zero. After
    /// the start, the delta accumulates unclamped so that a later positive adjustment can make up
    /// for an earlier negative one.
    pub fn adjust(&mut self, delta: i64, now: DateTime<Utc>) -> u64 {
        if self.is_started() {
            self.adjustment = self.adjustment.saturating_add(delta);
        } else {
            self.base = clamp(i128::from(self.base) + i128::from(delta));
        }
        self.time_left(now)
    }
}
