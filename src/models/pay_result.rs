//! Per-shift pay results.
//!
//! This module contains [`ShiftPayResult`] and the [`PayLine`] items it is
//! made of. A shift produces at most two pay lines: one for its daytime
//! minutes and one for its night minutes, each at the rate the
//! [`RateResolver`](crate::calculation::resolve_rate) selected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Diagnostic, ServiceCategory};

/// Which rate policy priced a shift.
///
/// The variants are listed in the order the policies are tried.
///
/// # Example
///
/// ```
/// use homecare_payroll::models::PayCategory;
///
/// let category = PayCategory::SpecialDate;
/// assert_eq!(serde_json::to_string(&category).unwrap(), "\"special_date\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayCategory {
    /// Year-end / New-Year flat rate.
    SpecialDate,
    /// Office flat rate.
    Office,
    /// Sales flat rate.
    Sales,
    /// Accompanying visit rate.
    Accompanying,
    /// The service category's standard rate.
    Standard,
}

impl std::fmt::Display for PayCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayCategory::SpecialDate => write!(f, "Special date"),
            PayCategory::Office => write!(f, "Office"),
            PayCategory::Sales => write!(f, "Sales"),
            PayCategory::Accompanying => write!(f, "Accompanying"),
            PayCategory::Standard => write!(f, "Standard"),
        }
    }
}

/// A single priced portion of a shift.
///
/// # Example
///
/// ```
/// use homecare_payroll::models::{PayCategory, PayLine, ServiceCategory};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let line = PayLine {
///     date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
///     shift_id: "shift_001".to_string(),
///     category: PayCategory::Standard,
///     service_category: ServiceCategory::BodyCare,
///     is_night: false,
///     minutes: 90,
///     hours: Decimal::new(15, 1),
///     rate: Decimal::new(2000, 0),
///     amount: Decimal::new(3000, 0),
/// };
/// assert_eq!(line.hours * line.rate, line.amount);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLine {
    /// The date of the shift this line belongs to.
    pub date: NaiveDate,
    /// The ID of the shift this pay line originated from.
    pub shift_id: String,
    /// The rate policy that priced the line.
    pub category: PayCategory,
    /// The shift's service category.
    pub service_category: ServiceCategory,
    /// Whether the minutes fall in the night window.
    pub is_night: bool,
    /// Minutes paid on this line.
    pub minutes: u32,
    /// `minutes` expressed in hours.
    pub hours: Decimal,
    /// The hourly rate applied.
    pub rate: Decimal,
    /// `minutes * rate / 60`, rounded to two decimal places.
    pub amount: Decimal,
}

/// The computed pay for one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPayResult {
    /// The shift this result was computed from.
    pub shift_id: String,
    /// The worker who worked the shift.
    pub worker_id: String,
    /// The shift date.
    pub date: NaiveDate,
    /// The shift's service category.
    pub service_category: ServiceCategory,
    /// The rate policy that priced the shift.
    pub category: PayCategory,
    /// Minutes outside the night window.
    pub regular_minutes: u32,
    /// Minutes inside the night window.
    pub night_minutes: u32,
    /// `regular_minutes` in hours.
    pub regular_hours: Decimal,
    /// `night_minutes` in hours.
    pub night_hours: Decimal,
    /// Hourly rate for regular minutes.
    pub regular_rate: Decimal,
    /// Hourly rate for night minutes.
    pub night_rate: Decimal,
    /// Sum of the pay line amounts.
    pub total_pay: Decimal,
    /// Day and night pay lines (lines with zero minutes are omitted).
    pub pay_lines: Vec<PayLine>,
    /// Problems found while pricing the shift.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ShiftPayResult {
    /// Total paid minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.regular_minutes + self.night_minutes
    }

    /// Total paid hours, `regular_hours + night_hours`.
    pub fn total_hours(&self) -> Decimal {
        self.regular_hours + self.night_hours
    }
}

/// Why a shift produced no pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The shift was cancelled.
    Cancelled,
}

/// The outcome of pricing one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShiftPayOutcome {
    /// The shift was priced.
    Paid(ShiftPayResult),
    /// The shift contributes nothing to any total.
    Skipped {
        /// The skipped shift.
        shift_id: String,
        /// Why it was skipped.
        reason: SkipReason,
    },
}

impl ShiftPayOutcome {
    /// Returns the priced result, if any.
    pub fn paid(&self) -> Option<&ShiftPayResult> {
        match self {
            ShiftPayOutcome::Paid(result) => Some(result),
            ShiftPayOutcome::Skipped { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_sample_result() -> ShiftPayResult {
        ShiftPayResult {
            shift_id: "shift_001".to_string(),
            worker_id: "helper_01".to_string(),
            date: make_date("2025-03-05"),
            service_category: ServiceCategory::BodyCare,
            category: PayCategory::Standard,
            regular_minutes: 120,
            night_minutes: 60,
            regular_hours: dec("2"),
            night_hours: dec("1"),
            regular_rate: dec("2000"),
            night_rate: dec("2500"),
            total_pay: dec("6500"),
            pay_lines: vec![],
            diagnostics: vec![],
        }
    }

    #[test]
    fn test_total_hours_is_sum_of_parts() {
        let result = create_sample_result();
        assert_eq!(result.total_hours(), dec("3"));
        assert_eq!(result.duration_minutes(), 180);
    }

    #[test]
    fn test_pay_category_serialization() {
        let json = serde_json::to_string(&PayCategory::Accompanying).unwrap();
        assert_eq!(json, "\"accompanying\"");

        let category: PayCategory = serde_json::from_str("\"office\"").unwrap();
        assert_eq!(category, PayCategory::Office);
    }

    #[test]
    fn test_pay_line_serialization_uses_decimal_strings() {
        let line = PayLine {
            date: make_date("2025-03-05"),
            shift_id: "shift_001".to_string(),
            category: PayCategory::Standard,
            service_category: ServiceCategory::Housework,
            is_night: true,
            minutes: 30,
            hours: dec("0.5"),
            rate: dec("1875"),
            amount: dec("937.5"),
        };

        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"date\":\"2025-03-05\""));
        assert!(json.contains("\"service_category\":\"housework\""));
        assert!(json.contains("\"is_night\":true"));
        assert!(json.contains("\"hours\":\"0.5\""));
        assert!(json.contains("\"amount\":\"937.5\""));
    }

    #[test]
    fn test_outcome_tagged_serialization() {
        let skipped = ShiftPayOutcome::Skipped {
            shift_id: "shift_002".to_string(),
            reason: SkipReason::Cancelled,
        };
        let json = serde_json::to_string(&skipped).unwrap();
        assert!(json.contains("\"status\":\"skipped\""));
        assert!(json.contains("\"reason\":\"cancelled\""));
        assert!(skipped.paid().is_none());

        let paid = ShiftPayOutcome::Paid(create_sample_result());
        let json = serde_json::to_string(&paid).unwrap();
        assert!(json.contains("\"status\":\"paid\""));
        let back: ShiftPayOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, paid);
    }
}
