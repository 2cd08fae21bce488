//! The six fixed time-of-day windows a prediction request is coarsened to.
//!
//! The prediction service takes a single timestamp, but the user picks a
//! named window; each window reduces deterministically to its midpoint on
//! the selected date.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::PredictionError;

/// One of six contiguous windows partitioning the 24-hour day.
///
/// | Label         | Window  | Midpoint |
/// |---------------|---------|----------|
/// | Late Night    | 00–06   | 03:00    |
/// | Early Morning | 06–09   | 07:30    |
/// | Late Morning  | 09–12   | 10:30    |
/// | Early Noon    | 12–15   | 13:30    |
/// | Late Noon     | 15–18   | 16:30    |
/// | Early Night   | 18–24   | 21:00    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    LateNight,
    EarlyMorning,
    LateMorning,
    EarlyNoon,
    LateNoon,
    EarlyNight,
}

impl TimeBucket {
    /// All buckets in day order.
    pub const ALL: [TimeBucket; 6] = [
        TimeBucket::LateNight,
        TimeBucket::EarlyMorning,
        TimeBucket::LateMorning,
        TimeBucket::EarlyNoon,
        TimeBucket::LateNoon,
        TimeBucket::EarlyNight,
    ];

    /// The user-facing label, also the canonical parse form.
    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::LateNight => "Late Night",
            TimeBucket::EarlyMorning => "Early Morning",
            TimeBucket::LateMorning => "Late Morning",
            TimeBucket::EarlyNoon => "Early Noon",
            TimeBucket::LateNoon => "Late Noon",
            TimeBucket::EarlyNight => "Early Night",
        }
    }

    /// The window as `[start, end)` hours on a 24-hour clock.
    pub fn hours(self) -> (u32, u32) {
        match self {
            TimeBucket::LateNight => (0, 6),
            TimeBucket::EarlyMorning => (6, 9),
            TimeBucket::LateMorning => (9, 12),
            TimeBucket::EarlyNoon => (12, 15),
            TimeBucket::LateNoon => (15, 18),
            TimeBucket::EarlyNight => (18, 24),
        }
    }

    /// Looks up a bucket by its exact label.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::InvalidBucketLabel`] for anything outside
    /// the fixed six-label set. The selector UI is closed, so hitting this
    /// from real input means a caller bug.
    pub fn from_label(label: &str) -> Result<Self, PredictionError> {
        Self::ALL
            .iter()
            .copied()
            .find(|bucket| bucket.label() == label)
            .ok_or_else(|| PredictionError::InvalidBucketLabel(label.to_string()))
    }

    /// The representative timestamp: this window's midpoint on `date`.
    ///
    /// Computed as `date 00:00 + (start + end) / 2` hours; half-hour
    /// midpoints land on `:30` exactly.
    pub fn midpoint(self, date: NaiveDate) -> NaiveDateTime {
        let (start, end) = self.hours();
        let minutes = (start + end) * 30;
        let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
            .expect("bucket midpoint is a valid time of day");
        date.and_time(time)
    }

    /// The bucket containing `time`. Every time of day falls in exactly one
    /// window, so this is the total inverse of the window table.
    pub fn for_time(time: NaiveTime) -> Self {
        match time.hour() {
            0..=5 => TimeBucket::LateNight,
            6..=8 => TimeBucket::EarlyMorning,
            9..=11 => TimeBucket::LateMorning,
            12..=14 => TimeBucket::EarlyNoon,
            15..=17 => TimeBucket::LateNoon,
            _ => TimeBucket::EarlyNight,
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeBucket {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}
