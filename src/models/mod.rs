//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod diagnostic;
mod pay_period;
mod pay_result;
mod payslip;
mod shift;
mod timesheet;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use pay_period::{PayPeriod, WeekRange};
pub use pay_result::{PayCategory, PayLine, ShiftPayOutcome, ShiftPayResult, SkipReason};
pub use payslip::{
    AttendanceSummary, CareListDay, CareListEntry, CompanyProfile, DeductionItem, PaymentItem,
    PayslipData, PayslipOptions, WorkerProfile,
};
pub use shift::{ServiceCategory, ShiftRecord};
pub use timesheet::{
    AttendanceBuckets, AttendanceHours, AttendanceMinutes, ClientTotals, DailyAttendance, MonthlyTimesheet, PeriodTotal, WeekTotal,
    WorkerMonth, WorkerPeriodTotals,
};
