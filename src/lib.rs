//! Timesheet and payroll calculation engine for home-care agencies.
//!
//! This crate turns shift records (one visit by a helper to a client) into
//! per-shift pay, weekly and monthly timesheets and payslip data. Night-window
//! premiums, year-end flat rates, accompanying visits and office/sales work are
//! priced from an agency rate table loaded from YAML.
//!
//! # Example
//!
//! ```
//! use homecare_payroll::calculation::aggregate_month;
//! use homecare_payroll::config::ConfigLoader;
//! use homecare_payroll::models::{ServiceCategory, ShiftRecord};
//! use chrono::NaiveDate;
//!
//! let config = ConfigLoader::load("./config/default")?;
//! let date = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
//! let shifts = vec![ShiftRecord::from_time_range(
//!     "s1", "helper_01", date, "22:00-06:00", ServiceCategory::SevereCare,
//! )?];
//!
//! let timesheet = aggregate_month(&shifts, &["helper_01"], config.rates(), 2025, 12)?;
//! assert_eq!(timesheet.period.end_date, NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
//! # Ok::<(), homecare_payroll::error::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
