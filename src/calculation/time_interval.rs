//! Time-of-day interval parsing and normalization.
//!
//! A [`TimeInterval`] is a half-open range of minutes `[start, end)` measured
//! from midnight of the shift date. Overnight shifts have `end > 1440`.

use chrono::{NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

const RANGE_SEPARATORS: [char; 5] = ['-', '~', '〜', '～', '–'];

/// Decimal places kept on every hour figure.
pub const HOURS_SCALE: u32 = 2;

/// Converts whole minutes to hours, rounded to [`HOURS_SCALE`] places.
///
/// Hour figures are always added up from values produced here, never
/// re-derived from summed minutes, so totals agree with their parts exactly.
///
/// ```
/// use homecare_payroll::calculation::minutes_to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(minutes_to_hours(90), Decimal::new(15, 1));
/// assert_eq!(minutes_to_hours(20), Decimal::new(33, 2));
/// assert_eq!(minutes_to_hours(50), Decimal::new(83, 2));
/// ```
pub fn minutes_to_hours(minutes: u32) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60u32))
        .round_dp_with_strategy(HOURS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// A minute-resolution interval on the shift date's timeline.
///
/// `end_minutes > start_minutes` always holds. When the end time of day is at
/// or before the start time, the shift is taken to end the next day.
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::TimeInterval;
///
/// let interval = TimeInterval::parse("23:00-02:00").unwrap();
/// assert_eq!(interval.start_minutes(), 23 * 60);
/// assert_eq!(interval.end_minutes(), 26 * 60);
/// assert_eq!(interval.duration_minutes(), 180);
///
/// assert!(TimeInterval::parse("nine to five").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    start_minutes: u32,
    end_minutes: u32,
}

impl TimeInterval {
    /// Builds an interval from two times of day. Seconds are ignored.
    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        let start_minutes = start.hour() * 60 + start.minute();
        let mut end_minutes = end.hour() * 60 + end.minute();
        if end_minutes <= start_minutes {
            end_minutes += MINUTES_PER_DAY;
        }
        Self {
            start_minutes,
            end_minutes,
        }
    }

    /// Parses a `"HH:MM-HH:MM"` range.
    ///
    /// Returns `None` for anything that is not two valid times separated by
    /// one of `-`, `~`, `〜`, `～` or `–`. Callers leave such shifts out of every total.
    pub fn parse(range: &str) -> Option<Self> {
        parse_time_range(range).map(|(start, end)| Self::from_times(start, end))
    }

    /// Start, in minutes after midnight of the shift date.
    pub fn start_minutes(&self) -> u32 {
        self.start_minutes
    }

    /// End, in minutes after midnight of the shift date (may exceed 1440).
    pub fn end_minutes(&self) -> u32 {
        self.end_minutes
    }

    /// Length of the interval in minutes; always positive.
    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes - self.start_minutes
    }

    /// Length of the interval in hours.
    pub fn duration_hours(&self) -> Decimal {
        minutes_to_hours(self.duration_minutes())
    }

    /// Whether the interval runs past midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.end_minutes > MINUTES_PER_DAY
    }
}

/// Parses a `"HH:MM-HH:MM"` range into its two times of day.
///
/// `24:00` is accepted as the end of a range and read as midnight.
///
/// ```
/// use homecare_payroll::calculation::parse_time_range;
/// use chrono::NaiveTime;
///
/// let (start, end) = parse_time_range(" 9:00 ~ 24:00 ").unwrap();
/// assert_eq!(start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
/// assert_eq!(end, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
/// ```
pub fn parse_time_range(range: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = range.trim().split_once(RANGE_SEPARATORS)?;
    Some((parse_time_token(start, false)?, parse_time_token(end, true)?))
}

/// Parses `"H:MM"` / `"HH:MM"` (ASCII or full-width colon).
fn parse_time_token(token: &str, is_end: bool) -> Option<NaiveTime> {
    let (hour, minute) = token.trim().split_once([':', '：'])?;
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !(1..=2).contains(&hour.len()) || minute.len() != 2 {
        return None;
    }
    if !is_digits(hour) || !is_digits(minute) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    match (hour, minute) {
        (24, 0) if is_end => NaiveTime::from_hms_opt(0, 0, 0),
        _ => NaiveTime::from_hms_opt(hour, minute, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_time(time_str: &str) -> NaiveTime {
        NaiveTime::parse_from_str(time_str, "%H:%M").unwrap()
    }

    #[test]
    fn test_daytime_interval() {
        let interval = TimeInterval::parse("09:00-12:30").unwrap();
        assert_eq!(interval.start_minutes(), 540);
        assert_eq!(interval.end_minutes(), 750);
        assert_eq!(interval.duration_hours(), dec("3.5"));
        assert!(!interval.crosses_midnight());
    }

    #[test]
    fn test_overnight_interval_adds_a_day() {
        let interval = TimeInterval::parse("23:00-01:00").unwrap();
        assert_eq!(interval.end_minutes(), 1500);
        assert_eq!(interval.duration_hours(), dec("2"));
        assert!(interval.crosses_midnight());
    }

    #[test]
    fn test_equal_start_and_end_is_a_full_day() {
        let interval = TimeInterval::from_times(make_time("09:00"), make_time("09:00"));
        assert_eq!(interval.duration_minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_midnight_end_token() {
        let interval = TimeInterval::parse("20:00-24:00").unwrap();
        assert_eq!(interval.end_minutes(), MINUTES_PER_DAY);
        assert_eq!(interval.duration_minutes(), 240);
        assert!(!interval.crosses_midnight());
    }

    #[test]
    fn test_alternate_separators() {
        for range in ["9:00~10:00", "9:00〜10:00", "9:00～10:00", "9：00-10：00"] {
            let interval = TimeInterval::parse(range);
            assert_eq!(
                interval.map(|i| i.duration_minutes()),
                Some(60),
                "range {:?}",
                range
            );
        }
    }

    #[test]
    fn test_malformed_ranges_yield_none() {
        for range in [
            "",
            "09:00",
            "09:00-",
            "9-12",
            "25:00-26:00",
            "09:60-10:00",
            "24:30-01:00",
            "24:00-01:00",
            "+9:00-10:00",
            "09:00-+9:00",
            "09:+5-10:00",
            "009:00-10:00",
            "09:0-10:00",
            "ab:cd-ef:gh",
        ] {
            assert!(TimeInterval::parse(range).is_none(), "range {:?}", range);
        }
    }

    #[test]
    fn test_seconds_are_ignored() {
        let start = NaiveTime::from_hms_opt(9, 0, 59).unwrap();
        let end = NaiveTime::from_hms_opt(10, 0, 1).unwrap();
        assert_eq!(TimeInterval::from_times(start, end).duration_minutes(), 60);
    }

    #[test]
    fn test_minutes_to_hours() {
        assert_eq!(minutes_to_hours(0), Decimal::ZERO);
        assert_eq!(minutes_to_hours(45), dec("0.75"));
        assert_eq!(minutes_to_hours(600), dec("10"));
        assert_eq!(minutes_to_hours(10), dec("0.17"));
        assert_eq!(minutes_to_hours(484), dec("8.07"));
    }

    #[test]
    fn test_midnight_token_only_ends_a_range() {
        assert!(parse_time_range("24:00-01:00").is_none());
        let (start, end) = parse_time_range("22:00-24:00").unwrap();
        assert_eq!(start, make_time("22:00"));
        assert_eq!(end, make_time("00:00"));
    }
}
