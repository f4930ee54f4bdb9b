//! HTTP API module for the payroll engine.
//!
//! This module provides REST endpoints over the calculation functions:
//! `POST /timesheet` for a monthly timesheet and `POST /payslip` for one
//! worker's payslip.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PayslipRequest, RejectedShift, ShiftRequest, TimesheetRequest, convert_shifts};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
