//! Night-window splitting.
//!
//! The night window runs from 22:00 to 08:00 the following morning. Because a
//! shift interval may start before midnight and end the next day, the window is
//! repeated once per day along the interval's timeline: `[1440k - 120, 1440k + 480)`
//! for every day `k` the interval touches.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::time_interval::{MINUTES_PER_DAY, TimeInterval, minutes_to_hours};

/// Start of the night window, in minutes after midnight (22:00).
pub const NIGHT_START_MINUTES: u32 = 22 * 60;

/// End of the night window, in minutes after midnight (08:00).
pub const NIGHT_END_MINUTES: u32 = 8 * 60;

/// A contiguous day-only or night-only portion of an interval.
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::{split_night, TimeInterval};
///
/// let split = split_night(&TimeInterval::parse("20:00-23:00").unwrap());
/// assert_eq!(split.segments.len(), 2);
/// assert!(!split.segments[0].is_night);
/// assert!(split.segments[1].is_night);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegment {
    /// Segment start, in minutes on the interval's timeline.
    pub start_minutes: u32,
    /// Segment end (exclusive).
    pub end_minutes: u32,
    /// Whether the segment lies inside the night window.
    pub is_night: bool,
}

impl TimeSegment {
    /// Segment length in minutes.
    pub fn minutes(&self) -> u32 {
        self.end_minutes - self.start_minutes
    }
}

/// The day/night decomposition of one interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightSplit {
    /// Minutes inside the night window.
    pub night_minutes: u32,
    /// Minutes outside the night window.
    pub day_minutes: u32,
    /// Chronological day and night segments covering the whole interval.
    pub segments: Vec<TimeSegment>,
}

impl NightSplit {
    /// Night minutes in hours.
    pub fn night_hours(&self) -> Decimal {
        minutes_to_hours(self.night_minutes)
    }

    /// Day minutes in hours.
    ///
    /// Taken as the remainder of the whole interval so that
    /// `day_hours() + night_hours() == duration_hours()` after rounding.
    pub fn day_hours(&self) -> Decimal {
        self.duration_hours() - self.night_hours()
    }

    /// The whole interval in hours.
    pub fn duration_hours(&self) -> Decimal {
        minutes_to_hours(self.night_minutes + self.day_minutes)
    }
}

/// Splits an interval into night-window and daytime minutes.
///
/// `night_minutes + day_minutes` always equals the interval's duration.
///
/// # Arguments
///
/// * `interval` - The normalized shift interval
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::{split_night, TimeInterval};
///
/// // 05:00-09:00: three hours before 08:00 are night, one hour is day.
/// let split = split_night(&TimeInterval::parse("05:00-09:00").unwrap());
/// assert_eq!(split.night_minutes, 180);
/// assert_eq!(split.day_minutes, 60);
///
/// // 23:00-01:00 crosses midnight and is entirely night.
/// let split = split_night(&TimeInterval::parse("23:00-01:00").unwrap());
/// assert_eq!(split.night_minutes, 120);
/// assert_eq!(split.day_minutes, 0);
/// ```
pub fn split_night(interval: &TimeInterval) -> NightSplit {
    let start = interval.start_minutes();
    let end = interval.end_minutes();

    let mut segments = Vec::new();
    let mut cursor = start;
    let mut night_minutes = 0;

    for (window_start, window_end) in night_windows(end) {
        let overlap_start = window_start.max(start);
        let overlap_end = window_end.min(end);
        if overlap_start >= overlap_end {
            continue;
        }

        if cursor < overlap_start {
            segments.push(TimeSegment {
                start_minutes: cursor,
                end_minutes: overlap_start,
                is_night: false,
            });
        }
        segments.push(TimeSegment {
            start_minutes: overlap_start,
            end_minutes: overlap_end,
            is_night: true,
        });
        night_minutes += overlap_end - overlap_start;
        cursor = overlap_end;
    }

    if cursor < end {
        segments.push(TimeSegment {
            start_minutes: cursor,
            end_minutes: end,
            is_night: false,
        });
    }

    NightSplit {
        night_minutes,
        day_minutes: interval.duration_minutes() - night_minutes,
        segments,
    }
}

/// Night windows touching `[0, end)`, clipped at zero, in chronological order.
fn night_windows(end: u32) -> impl Iterator<Item = (u32, u32)> {
    let days = end / MINUTES_PER_DAY + 1;
    (0..=days).map(|k| {
        let day_start = k * MINUTES_PER_DAY;
        let window_start = (day_start + NIGHT_START_MINUTES).saturating_sub(MINUTES_PER_DAY);
        (window_start, day_start + NIGHT_END_MINUTES)
    })
}
