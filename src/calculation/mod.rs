//! Calculation logic for the payroll engine.
//!
//! This module contains every step from a raw shift to a payslip: time-range
//! parsing and overnight normalization, night-window splitting, rate
//! resolution, per-shift pay, week bucketing with the year-end carryover,
//! monthly aggregation and payslip assembly.
//!
//! All functions are pure. Configuration is passed in explicitly and nothing
//! reads the clock, so the same input always yields the same output.

mod aggregate;
mod calendar;
mod night_split;
mod payslip;
mod rate_resolver;
mod shift_pay;
mod time_interval;

pub use aggregate::{aggregate_month, aggregate_worker, attendance_hours, attendance_minutes};
pub use calendar::{
    CARRYOVER_LAST_DAY, MonthCalendar, WEEK_ROWS, last_day_of_month, payroll_period, week_ranges,
};
pub use night_split::{
    NIGHT_END_MINUTES, NIGHT_START_MINUTES, NightSplit, TimeSegment, split_night,
};
pub use payslip::{PayslipInput, assemble_payslip, payment_date, round_currency};
pub use rate_resolver::{RateContext, RatePolicy, ResolvedRate, resolve_rate};
pub use shift_pay::{AMOUNT_SCALE, calculate_shift_pay};
pub use time_interval::{
    HOURS_SCALE, MINUTES_PER_DAY, TimeInterval, minutes_to_hours, parse_time_range,
};
