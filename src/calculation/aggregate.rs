//! Monthly aggregation.
//!
//! Prices every shift of a payroll month and rolls the results up per worker
//! into week rows, a monthly total, an attendance matrix and per-client
//! totals.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::error::EngineResult;
use crate::models::{
    AttendanceBuckets, AttendanceHours, AttendanceMinutes, ClientTotals, DailyAttendance, Diagnostic, DiagnosticCode, MonthlyTimesheet,
    PeriodTotal, Severity, ShiftPayOutcome, ShiftPayResult, ShiftRecord, SkipReason, WorkerMonth,
    WorkerPeriodTotals,
};

use super::calendar::MonthCalendar;
use super::rate_resolver::RateContext;
use super::shift_pay::calculate_shift_pay;

/// Aggregates a payroll month for a set of workers.
///
/// Shifts belonging to workers not in `worker_ids`, or dated outside the
/// month's pay period, are ignored. Cancelled shifts are counted but add
/// nothing to any total. Workers appear in the result in the order given;
/// repeated ids are reported once.
///
/// # Arguments
///
/// * `shifts` - All shift records for the month, in any order
/// * `worker_ids` - The workers to report on
/// * `rates` - The agency's rate table
/// * `year` - Payroll year
/// * `month` - Payroll month (1-12)
///
/// # Errors
///
/// Returns [`EngineError::InvalidPeriod`](crate::error::EngineError::InvalidPeriod)
/// if the month is invalid. Problems with individual shifts never fail the run;
/// they are reported as diagnostics on the worker.
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::aggregate_month;
/// use homecare_payroll::config::ConfigLoader;
/// use homecare_payroll::models::{ServiceCategory, ShiftRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
/// let shifts = vec![
///     ShiftRecord::from_time_range("s1", "helper_01", date, "09:00-12:00", ServiceCategory::BodyCare)?,
///     ShiftRecord::from_time_range("s2", "helper_01", date, "13:00-14:00", ServiceCategory::Housework)?,
/// ];
///
/// let timesheet = aggregate_month(&shifts, &["helper_01"], loader.rates(), 2025, 3)?;
/// let worker = timesheet.worker("helper_01").unwrap();
/// assert_eq!(worker.totals.monthly.hours, Decimal::new(4, 0));
/// assert_eq!(worker.totals.monthly.amount, Decimal::new(7600, 0));
/// # Ok::<(), homecare_payroll::error::EngineError>(())
/// ```
pub fn aggregate_month<S: AsRef<str>>(
    shifts: &[ShiftRecord],
    worker_ids: &[S],
    rates: &RateTable,
    year: i32,
    month: u32,
) -> EngineResult<MonthlyTimesheet> {
    let calendar = MonthCalendar::new(year, month)?;

    let mut seen = BTreeSet::new();
    let workers: Vec<WorkerMonth> = worker_ids
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| seen.insert(*id))
        .map(|worker_id| aggregate_worker(shifts, worker_id, rates, &calendar))
        .collect();

    tracing::info!(
        year,
        month,
        workers = workers.len(),
        shifts = shifts.len(),
        "Aggregated payroll month"
    );

    Ok(MonthlyTimesheet {
        period: *calendar.period(),
        weeks: calendar.weeks().to_vec(),
        workers,
    })
}

/// Aggregates one worker's shifts against a prepared calendar.
///
/// Shifts are processed in `(date, start_time, id)` order, so the result does
/// not depend on input order.
pub fn aggregate_worker(
    shifts: &[ShiftRecord],
    worker_id: &str,
    rates: &RateTable,
    calendar: &MonthCalendar,
) -> WorkerMonth {
    let mut owned: Vec<&ShiftRecord> = shifts
        .iter()
        .filter(|s| s.worker_id == worker_id && calendar.period().contains_date(s.date))
        .collect();
    owned.sort_by(|a, b| {
        (a.date, a.start_time, &a.id).cmp(&(b.date, b.start_time, &b.id))
    });

    let mut accumulator = WorkerAccumulator::new(worker_id, calendar);
    for shift in owned {
        let Some(week_index) = calendar.locate(shift.date) else {
            tracing::warn!(
                shift_id = %shift.id,
                worker_id,
                date = %shift.date,
                "Shift date falls in no week row; excluded from totals"
            );
            accumulator.diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::OutsideWeekRange,
                    Severity::High,
                    format!("shift date {} falls in no week row", shift.date),
                )
                .for_shift(shift.id.clone()),
            );
            continue;
        };

        match calculate_shift_pay(shift, rates) {
            ShiftPayOutcome::Paid(result) => accumulator.add(shift, week_index, result),
            ShiftPayOutcome::Skipped { reason, .. } => {
                if reason == SkipReason::Cancelled {
                    accumulator.cancelled_shift_count += 1;
                }
            }
        }
    }

    let month = accumulator.finish(calendar);
    tracing::debug!(
        worker_id,
        shifts = month.shift_results.len(),
        cancelled = month.cancelled_shift_count,
        hours = %month.totals.monthly.hours,
        amount = %month.totals.monthly.amount,
        diagnostics = month.diagnostics.len(),
        "Aggregated worker"
    );
    month
}

/// Splits a priced shift's minutes into attendance buckets.
///
/// Routing follows the rate policies: office, then sales, then accompanying,
/// then regular care.
pub fn attendance_minutes(shift: &ShiftRecord, result: &ShiftPayResult) -> AttendanceMinutes {
    route_buckets(
        shift,
        result.regular_minutes,
        result.night_minutes,
        result.duration_minutes(),
    )
}

/// Splits a priced shift's hours into attendance buckets, routed like
/// [`attendance_minutes`].
pub fn attendance_hours(shift: &ShiftRecord, result: &ShiftPayResult) -> AttendanceHours {
    route_buckets(
        shift,
        result.regular_hours,
        result.night_hours,
        result.total_hours(),
    )
}

fn route_buckets<T: Copy + Default>(
    shift: &ShiftRecord,
    regular: T,
    night: T,
    total: T,
) -> AttendanceBuckets<T> {
    let context = RateContext::from(shift);
    if context.is_office_work() {
        AttendanceBuckets {
            office: total,
            ..Default::default()
        }
    } else if context.is_sales_work() {
        AttendanceBuckets {
            sales: total,
            ..Default::default()
        }
    } else if context.is_accompanying {
        AttendanceBuckets {
            accompanying: regular,
            accompanying_night: night,
            ..Default::default()
        }
    } else {
        AttendanceBuckets {
            regular,
            night,
            ..Default::default()
        }
    }
}

#[derive(Default)]
struct DayAccumulator {
    hours: AttendanceHours,
    shift_count: u32,
    amount: Decimal,
}

struct WorkerAccumulator {
    totals: WorkerPeriodTotals,
    attendance: AttendanceMinutes,
    attendance_hours: AttendanceHours,
    days: BTreeMap<NaiveDate, DayAccumulator>,
    clients: BTreeMap<String, ClientTotals>,
    shift_results: Vec<ShiftPayResult>,
    cancelled_shift_count: u32,
    diagnostics: Vec<Diagnostic>,
}

impl WorkerAccumulator {
    fn new(worker_id: &str, calendar: &MonthCalendar) -> Self {
        Self {
            totals: WorkerPeriodTotals::empty(worker_id, calendar.weeks()),
            attendance: AttendanceMinutes::default(),
            attendance_hours: AttendanceHours::default(),
            days: BTreeMap::new(),
            clients: BTreeMap::new(),
            shift_results: Vec::new(),
            cancelled_shift_count: 0,
            diagnostics: Vec::new(),
        }
    }

    fn add(&mut self, shift: &ShiftRecord, week_index: usize, result: ShiftPayResult) {
        let minutes = result.duration_minutes();
        let hours = result.total_hours();
        let amount = result.total_pay;

        if let Some(week) = self.totals.weekly.get_mut(week_index) {
            week.total.add(minutes, hours, amount);
        }
        self.totals.monthly.add(minutes, hours, amount);

        self.attendance.merge(&attendance_minutes(shift, &result));
        let bucket_hours = attendance_hours(shift, &result);
        self.attendance_hours.merge(&bucket_hours);

        let day = self.days.entry(shift.date).or_default();
        day.hours.merge(&bucket_hours);
        day.shift_count += 1;
        day.amount += amount;

        let client = self
            .clients
            .entry(shift.client_name.clone())
            .or_insert_with(|| ClientTotals {
                client_name: shift.client_name.clone(),
                shift_count: 0,
                total: PeriodTotal::default(),
            });
        client.shift_count += 1;
        client.total.add(minutes, hours, amount);

        self.diagnostics.extend(result.diagnostics.iter().cloned());
        self.shift_results.push(result);
    }

    fn finish(self, calendar: &MonthCalendar) -> WorkerMonth {
        let daily_attendance = calendar
            .attendance_days()
            .map(|date| {
                let is_carryover = calendar.is_carryover(date);
                match self.days.get(&date) {
                    Some(day) => DailyAttendance::from_hours(
                        date,
                        is_carryover,
                        day.shift_count,
                        &day.hours,
                        day.amount,
                    ),
                    None => DailyAttendance::from_hours(
                        date,
                        is_carryover,
                        0,
                        &AttendanceHours::default(),
                        Decimal::ZERO,
                    ),
                }
            })
            .collect();

        WorkerMonth {
            totals: self.totals,
            attendance_minutes: self.attendance,
            attendance_hours: self.attendance_hours,
            daily_attendance,
            client_totals: self.clients.into_values().collect(),
            shift_results: self.shift_results,
            cancelled_shift_count: self.cancelled_shift_count,
            diagnostics: self.diagnostics,
        }
    }
}
