//! Monthly timesheet models produced by the aggregator.
//!
//! Every hour figure is a sum of per-shift hours, each already rounded to a
//! fixed scale, so weekly, daily and monthly totals agree exactly.

use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Diagnostic, PayPeriod, ShiftPayResult, WeekRange};

/// Hours and pay accumulated over some span of time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodTotal {
    /// Paid minutes.
    pub minutes: u32,
    /// Paid hours.
    pub hours: Decimal,
    /// Pay, summed from per-shift amounts.
    pub amount: Decimal,
}

impl PeriodTotal {
    /// Adds one shift's minutes, hours and pay.
    pub fn add(&mut self, minutes: u32, hours: Decimal, amount: Decimal) {
        self.minutes += minutes;
        self.hours += hours;
        self.amount += amount;
    }
}

/// Hours and pay for one week row of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekTotal {
    /// The week row, 1 to 6.
    pub week_number: u8,
    /// Whether the row is an unused trailing week (always zero).
    pub is_grayed_out: bool,
    /// Totals for the row.
    #[serde(flatten)]
    pub total: PeriodTotal,
}

/// A worker's weekly and monthly totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPeriodTotals {
    /// The worker.
    pub worker_id: String,
    /// One entry per week row, always six.
    pub weekly: Vec<WeekTotal>,
    /// Roll-up of the whole pay period.
    pub monthly: PeriodTotal,
}

impl WorkerPeriodTotals {
    /// Creates zeroed totals aligned with the given week grid.
    pub fn empty(worker_id: impl Into<String>, weeks: &[WeekRange]) -> Self {
        Self {
            worker_id: worker_id.into(),
            weekly: weeks
                .iter()
                .map(|w| WeekTotal {
                    week_number: w.week_number,
                    is_grayed_out: w.is_grayed_out,
                    total: PeriodTotal::default(),
                })
                .collect(),
            monthly: PeriodTotal::default(),
        }
    }
}

/// A quantity split across the attendance buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceBuckets<T> {
    /// Daytime care.
    pub regular: T,
    /// Night-window care.
    pub night: T,
    /// Daytime accompanying visits.
    pub accompanying: T,
    /// Night-window accompanying visits.
    pub accompanying_night: T,
    /// Office work.
    pub office: T,
    /// Sales work.
    pub sales: T,
}

/// Minutes per attendance bucket.
pub type AttendanceMinutes = AttendanceBuckets<u32>;

/// Hours per attendance bucket.
pub type AttendanceHours = AttendanceBuckets<Decimal>;

impl<T: Copy + Add<Output = T> + AddAssign> AttendanceBuckets<T> {
    /// Sum of every bucket.
    pub fn total(&self) -> T {
        self.regular
            + self.night
            + self.accompanying
            + self.accompanying_night
            + self.office
            + self.sales
    }

    /// Adds another set of buckets.
    pub fn merge(&mut self, other: &Self) {
        self.regular += other.regular;
        self.night += other.night;
        self.accompanying += other.accompanying;
        self.accompanying_night += other.accompanying_night;
        self.office += other.office;
        self.sales += other.sales;
    }
}

/// One row of the attendance matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendance {
    /// The calendar day.
    pub date: NaiveDate,
    /// True for next-January days counted in December's payroll.
    pub is_carryover: bool,
    /// Number of paid shifts on the day.
    pub shift_count: u32,
    /// Daytime care hours.
    pub regular_hours: Decimal,
    /// Night-window care hours.
    pub night_hours: Decimal,
    /// Daytime accompanying hours.
    pub accompanying_hours: Decimal,
    /// Night-window accompanying hours.
    pub accompanying_night_hours: Decimal,
    /// Office hours.
    pub office_hours: Decimal,
    /// Sales hours.
    pub sales_hours: Decimal,
    /// Sum of the buckets above.
    pub total_hours: Decimal,
    /// Pay for the day, summed from per-shift amounts.
    pub amount: Decimal,
}

impl DailyAttendance {
    /// Builds a row from accumulated bucket hours.
    pub fn from_hours(
        date: NaiveDate,
        is_carryover: bool,
        shift_count: u32,
        hours: &AttendanceHours,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            is_carryover,
            shift_count,
            regular_hours: hours.regular,
            night_hours: hours.night,
            accompanying_hours: hours.accompanying,
            accompanying_night_hours: hours.accompanying_night,
            office_hours: hours.office,
            sales_hours: hours.sales,
            total_hours: hours.total(),
            amount,
        }
    }

    /// Sum of the named buckets; always equals `total_hours`.
    pub fn bucket_sum(&self) -> Decimal {
        self.regular_hours
            + self.night_hours
            + self.accompanying_hours
            + self.accompanying_night_hours
            + self.office_hours
            + self.sales_hours
    }
}

/// Hours and pay for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTotals {
    /// The client visited.
    pub client_name: String,
    /// Paid shifts with this client.
    pub shift_count: u32,
    /// Hours and pay.
    #[serde(flatten)]
    pub total: PeriodTotal,
}

/// Everything the aggregator computed for one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerMonth {
    /// Weekly and monthly totals.
    pub totals: WorkerPeriodTotals,
    /// Per-bucket minutes for the whole period.
    pub attendance_minutes: AttendanceMinutes,
    /// Per-bucket hours for the whole period; their total is `totals.monthly.hours`.
    pub attendance_hours: AttendanceHours,
    /// Attendance matrix: one row per day of the month, plus carryover days.
    pub daily_attendance: Vec<DailyAttendance>,
    /// Per-client totals, sorted by client name.
    pub client_totals: Vec<ClientTotals>,
    /// Priced shifts in date order.
    pub shift_results: Vec<ShiftPayResult>,
    /// Cancelled shifts inside the period.
    pub cancelled_shift_count: u32,
    /// Problems found while aggregating this worker.
    pub diagnostics: Vec<Diagnostic>,
}

impl WorkerMonth {
    /// The worker's id.
    pub fn worker_id(&self) -> &str {
        &self.totals.worker_id
    }
}

/// The result of aggregating one payroll month for a set of workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTimesheet {
    /// The shift dates counted.
    pub period: PayPeriod,
    /// The six-row week grid.
    pub weeks: Vec<WeekRange>,
    /// One entry per requested worker, in request order.
    pub workers: Vec<WorkerMonth>,
}

impl MonthlyTimesheet {
    /// Looks up one worker's result.
    pub fn worker(&self, worker_id: &str) -> Option<&WorkerMonth> {
        self.workers.iter().find(|w| w.worker_id() == worker_id)
    }

    /// All diagnostics across workers.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.workers.iter().flat_map(|w| w.diagnostics.iter())
    }
}
