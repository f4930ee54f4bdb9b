//! Per-shift pay calculation.
//!
//! Combines interval normalization, the night split and rate resolution into
//! a [`ShiftPayOutcome`] for a single shift record.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::RateTable;
use crate::models::{PayLine, ShiftPayOutcome, ShiftPayResult, ShiftRecord, SkipReason};

use super::night_split::split_night;
use super::rate_resolver::{RateContext, resolve_rate};
use super::time_interval::TimeInterval;

/// Decimal places kept on pay line amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Calculates pay for one shift.
///
/// This function prices a shift by:
/// 1. Skipping it if it is cancelled
/// 2. Normalizing its times into an interval (overnight shifts end the next day,
///    so the duration is always at least one minute)
/// 3. Splitting the interval into daytime and night-window minutes
/// 4. Resolving the regular and night rates
/// 5. Generating one pay line per non-empty portion
///
/// Each line's amount is `minutes * rate / 60` rounded half away from zero to
/// [`AMOUNT_SCALE`] places, and `total_pay` is the exact sum of the lines.
/// Regular hours are the shift's duration in hours less its night hours, so
/// the two always add up to the duration. A missing category rate prices the
/// shift at zero and attaches a diagnostic rather than failing.
///
/// # Arguments
///
/// * `shift` - The shift to price
/// * `rates` - The agency's rate table
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::calculate_shift_pay;
/// use homecare_payroll::config::ConfigLoader;
/// use homecare_payroll::models::{ServiceCategory, ShiftRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
/// let shift = ShiftRecord::from_time_range("s1", "w1", date, "20:00-23:00", ServiceCategory::BodyCare)?;
///
/// let outcome = calculate_shift_pay(&shift, loader.rates());
/// let result = outcome.paid().unwrap();
/// assert_eq!(result.regular_hours, Decimal::new(2, 0));
/// assert_eq!(result.night_hours, Decimal::new(1, 0));
/// // 2h x 2000 + 1h x 2500
/// assert_eq!(result.total_pay, Decimal::new(6500, 0));
/// # Ok::<(), homecare_payroll::error::EngineError>(())
/// ```
pub fn calculate_shift_pay(shift: &ShiftRecord, rates: &RateTable) -> ShiftPayOutcome {
    if shift.is_cancelled {
        return ShiftPayOutcome::Skipped {
            shift_id: shift.id.clone(),
            reason: SkipReason::Cancelled,
        };
    }

    let interval = TimeInterval::from_times(shift.start_time, shift.end_time);
    let split = split_night(&interval);
    let regular_hours = split.day_hours();
    let night_hours = split.night_hours();
    let resolved = resolve_rate(&RateContext::from(shift), rates);

    let mut diagnostics = Vec::new();
    if let Some(diagnostic) = resolved.diagnostic {
        tracing::warn!(
            shift_id = %shift.id,
            worker_id = %shift.worker_id,
            service_category = %shift.service_category,
            "No rate configured; shift priced at zero"
        );
        diagnostics.push(diagnostic.for_shift(shift.id.clone()));
    }

    let pay_lines: Vec<PayLine> = [
        (false, split.day_minutes, regular_hours, resolved.regular_rate),
        (true, split.night_minutes, night_hours, resolved.night_rate),
    ]
    .into_iter()
    .filter(|(_, minutes, _, _)| *minutes > 0)
    .map(|(is_night, minutes, hours, rate)| PayLine {
        date: shift.date,
        shift_id: shift.id.clone(),
        category: resolved.category,
        service_category: shift.service_category,
        is_night,
        minutes,
        hours,
        rate,
        amount: minutes_amount(minutes, rate),
    })
    .collect();

    let total_pay = pay_lines.iter().map(|line| line.amount).sum();

    tracing::trace!(
        shift_id = %shift.id,
        category = %resolved.category,
        day_minutes = split.day_minutes,
        night_minutes = split.night_minutes,
        total_pay = %total_pay,
        "Priced shift"
    );

    ShiftPayOutcome::Paid(ShiftPayResult {
        shift_id: shift.id.clone(),
        worker_id: shift.worker_id.clone(),
        date: shift.date,
        service_category: shift.service_category,
        category: resolved.category,
        regular_minutes: split.day_minutes,
        night_minutes: split.night_minutes,
        regular_hours,
        night_hours,
        regular_rate: resolved.regular_rate,
        night_rate: resolved.night_rate,
        total_pay,
        pay_lines,
        diagnostics,
    })
}

/// Pay for `minutes` at an hourly `rate`, rounded to [`AMOUNT_SCALE`] places.
fn minutes_amount(minutes: u32, rate: Decimal) -> Decimal {
    (Decimal::from(minutes) * rate / Decimal::from(60u32))
        .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
