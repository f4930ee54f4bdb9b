//! Calendar bucketing for monthly payroll.
//!
//! A month is displayed as a fixed grid of six week rows. Each row starts the
//! day after the previous one ends and ends on the first Sunday on or after its
//! start, or on the month's last day. Rows the month does not reach are grayed
//! out.
//!
//! December's payroll also counts the first days of the following January
//! (the year-end holiday), which the next January run then skips.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, WeekRange};

/// Number of week rows in the grid.
pub const WEEK_ROWS: usize = 6;

/// Last January day counted in the previous December's payroll.
pub const CARRYOVER_LAST_DAY: u32 = 4;

/// Returns the last day of a month, or `None` if the month does not exist.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let last = last_day_of_month(year, month);
    match (first, last) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(EngineError::InvalidPeriod { year, month }),
    }
}

/// Builds the six-row week grid for a month.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPeriod`] if `month` is not 1-12 or the year is
/// out of range.
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::week_ranges;
/// use chrono::NaiveDate;
///
/// // March 2025 starts on a Saturday and needs all six rows.
/// let weeks = week_ranges(2025, 3).unwrap();
/// assert_eq!(weeks.len(), 6);
/// assert_eq!(weeks[0].end_date, NaiveDate::from_ymd_opt(2025, 3, 2));
/// assert_eq!(weeks[5].start_date, NaiveDate::from_ymd_opt(2025, 3, 31));
/// assert!(weeks.iter().all(|w| !w.is_grayed_out));
/// ```
pub fn week_ranges(year: i32, month: u32) -> EngineResult<Vec<WeekRange>> {
    let (first, last) = month_bounds(year, month)?;

    let mut weeks = Vec::with_capacity(WEEK_ROWS);
    let mut start = Some(first);
    for week_number in 1..=WEEK_ROWS as u8 {
        match start {
            Some(week_start) if week_start <= last => {
                let to_sunday = (7 - week_start.weekday().num_days_from_sunday()) % 7;
                let end = week_start
                    .checked_add_days(Days::new(u64::from(to_sunday)))
                    .map_or(last, |sunday| sunday.min(last));
                weeks.push(WeekRange::populated(week_number, week_start, end));
                start = end.succ_opt();
            }
            _ => weeks.push(WeekRange::grayed_out(week_number)),
        }
    }

    Ok(weeks)
}

/// Returns the range of shift dates a month's payroll counts.
///
/// - December runs from December 1 to January 4 of the next year.
/// - January starts on January 5.
/// - Every other month is its calendar month.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPeriod`] for an invalid month.
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::payroll_period;
/// use chrono::NaiveDate;
///
/// let december = payroll_period(2025, 12).unwrap();
/// assert_eq!(december.end_date, NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
///
/// let january = payroll_period(2026, 1).unwrap();
/// assert_eq!(january.start_date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
/// ```
pub fn payroll_period(year: i32, month: u32) -> EngineResult<PayPeriod> {
    let (first, last) = month_bounds(year, month)?;
    let invalid = || EngineError::InvalidPeriod { year, month };

    let (start_date, end_date) = match month {
        12 => (
            first,
            NaiveDate::from_ymd_opt(year + 1, 1, CARRYOVER_LAST_DAY).ok_or_else(invalid)?,
        ),
        1 => (
            NaiveDate::from_ymd_opt(year, 1, CARRYOVER_LAST_DAY + 1).ok_or_else(invalid)?,
            last,
        ),
        _ => (first, last),
    };

    Ok(PayPeriod {
        year,
        month,
        start_date,
        end_date,
    })
}

/// The week grid and pay period for one payroll month.
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::MonthCalendar;
/// use chrono::NaiveDate;
///
/// let calendar = MonthCalendar::new(2025, 12).unwrap();
/// let new_year = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
///
/// assert!(calendar.is_carryover(new_year));
/// // Carryover days land in December's last populated week.
/// assert_eq!(calendar.locate(new_year), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    period: PayPeriod,
    weeks: Vec<WeekRange>,
    month_start: NaiveDate,
    month_end: NaiveDate,
}

impl MonthCalendar {
    /// Builds the calendar for a payroll month.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] for an invalid month.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let (month_start, month_end) = month_bounds(year, month)?;
        Ok(Self {
            period: payroll_period(year, month)?,
            weeks: week_ranges(year, month)?,
            month_start,
            month_end,
        })
    }

    /// The shift dates counted.
    pub fn period(&self) -> &PayPeriod {
        &self.period
    }

    /// The six-row week grid.
    pub fn weeks(&self) -> &[WeekRange] {
        &self.weeks
    }

    /// Whether `date` is a next-January day counted in this December.
    pub fn is_carryover(&self, date: NaiveDate) -> bool {
        date > self.month_end && self.period.contains_date(date)
    }

    /// Index of the week row a shift date is counted in.
    ///
    /// Returns `None` for dates outside the pay period.
    pub fn locate(&self, date: NaiveDate) -> Option<usize> {
        if !self.period.contains_date(date) {
            return None;
        }
        if self.is_carryover(date) {
            return self.weeks.iter().rposition(|w| !w.is_grayed_out);
        }
        self.weeks.iter().position(|w| w.contains(date))
    }

    /// Rows of the attendance matrix: every day of the month followed by any
    /// carryover days.
    pub fn attendance_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.month_start
            .iter_days()
            .take_while(move |d| *d <= self.period.end_date.max(self.month_end))
    }
}
