//! Pay period and week bucket models.
//!
//! This module contains the [`PayPeriod`] a monthly payroll run covers and
//! the [`WeekRange`] buckets the month is displayed in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The range of shift dates counted in one monthly payroll run.
///
/// This is usually the calendar month, except around New Year: December's
/// period runs into early January and the following January's period starts
/// late accordingly.
///
/// # Example
///
/// ```
/// use homecare_payroll::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     year: 2025,
///     month: 12,
///     start_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Payroll year.
    pub year: i32,
    /// Payroll month (1-12).
    pub month: u32,
    /// First shift date counted (inclusive).
    pub start_date: NaiveDate,
    /// Last shift date counted (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// One row of the fixed six-row weekly grid for a month.
///
/// Populated rows end on a Sunday or on the month's last day. Rows beyond
/// the month's last week are grayed out and have no dates; their bounds
/// serialize as empty strings.
///
/// # Example
///
/// ```
/// use homecare_payroll::models::WeekRange;
/// use chrono::NaiveDate;
///
/// let week = WeekRange::populated(
///     1,
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
/// );
/// assert_eq!(week.day_count(), 5);
///
/// let empty = WeekRange::grayed_out(6);
/// assert!(empty.is_grayed_out);
/// assert!(!empty.contains(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    /// Position in the grid, 1 to 6.
    pub week_number: u8,
    /// First day of the week within the month.
    #[serde(with = "empty_date")]
    pub start_date: Option<NaiveDate>,
    /// Last day of the week within the month.
    #[serde(with = "empty_date")]
    pub end_date: Option<NaiveDate>,
    /// True for trailing rows the month does not reach.
    pub is_grayed_out: bool,
}

impl WeekRange {
    /// Creates a populated week.
    pub fn populated(week_number: u8, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            week_number,
            start_date: Some(start_date),
            end_date: Some(end_date),
            is_grayed_out: false,
        }
    }

    /// Creates an unused trailing week.
    pub fn grayed_out(week_number: u8) -> Self {
        Self {
            week_number,
            start_date: None,
            end_date: None,
            is_grayed_out: true,
        }
    }

    /// Whether `date` falls inside this week. Always false when grayed out.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => date >= start && date <= end,
            _ => false,
        }
    }

    /// Number of days covered, zero when grayed out.
    pub fn day_count(&self) -> i64 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => (end - start).num_days() + 1,
            _ => 0,
        }
    }
}

/// Serializes `Option<NaiveDate>` as `"YYYY-MM-DD"` or `""`.
mod empty_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
