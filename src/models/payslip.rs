//! Payslip document models.
//!
//! [`PayslipData`] is the shape rendering and export consumers read. It
//! carries no presentation details; labels are plain strings and amounts are
//! already rounded to whole currency units.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DailyAttendance, Diagnostic, PayPeriod, ServiceCategory};

/// Identity of the agency issuing payslips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Registered name.
    pub name: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Name of the representative printed on payslips.
    #[serde(default)]
    pub representative: String,
    /// Day of the following month wages are paid (1-31, clamped to month length).
    pub pay_day: u32,
}

/// Identity of the worker a payslip is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    /// Worker id, matching [`ShiftRecord::worker_id`](super::ShiftRecord::worker_id).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Payroll number, if the agency uses one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_number: Option<String>,
    /// Department or office.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// One line in the payments column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentItem {
    /// Stable machine key, e.g. `"standard:body_care:night"` or `"allowance:transport"`.
    pub code: String,
    /// Display label.
    pub label: String,
    /// Hours paid, for hour-based items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Decimal>,
    /// Hourly rate, for hour-based items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    /// Amount in whole currency units.
    pub amount: Decimal,
}

/// One line in the deductions column. Always externally supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionItem {
    /// Stable machine key, e.g. `"health_insurance"`.
    pub code: String,
    /// Display label.
    pub label: String,
    /// Amount withheld.
    pub amount: Decimal,
}

/// The attendance block at the top of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days with at least one paid shift.
    pub working_days: u32,
    /// Paid shifts.
    pub shift_count: u32,
    /// Cancelled shifts in the period.
    pub cancelled_shift_count: u32,
    /// All paid hours.
    pub total_hours: Decimal,
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
}

/// One visit in the care list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareListEntry {
    /// The shift.
    pub shift_id: String,
    /// The client visited.
    pub client_name: String,
    /// The kind of care delivered.
    pub service_category: ServiceCategory,
    /// `"HH:MM-HH:MM"`.
    pub time_range: String,
    /// Scheduled duration in hours.
    pub hours: Decimal,
    /// Whether the visit was cancelled.
    pub is_cancelled: bool,
}

/// All visits on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareListDay {
    /// The date.
    pub date: NaiveDate,
    /// Visits ordered by start time.
    pub entries: Vec<CareListEntry>,
}

/// Switches for payslip assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayslipOptions {
    /// List cancelled visits (flagged) in the care list instead of omitting them.
    #[serde(default)]
    pub include_cancelled_in_care_list: bool,
}

/// A complete payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipData {
    /// Issuing agency.
    pub company: CompanyProfile,
    /// Paid worker.
    pub worker: WorkerProfile,
    /// Shift dates covered.
    pub period: PayPeriod,
    /// Wage payment date.
    pub payment_date: NaiveDate,
    /// Attendance block.
    pub attendance: AttendanceSummary,
    /// Payments column.
    pub payments: Vec<PaymentItem>,
    /// Deductions column.
    pub deductions: Vec<DeductionItem>,
    /// Sum of `payments`.
    pub total_payments: Decimal,
    /// Sum of `deductions`.
    pub total_deductions: Decimal,
    /// `total_payments - total_deductions`.
    pub net_pay: Decimal,
    /// Attendance matrix.
    pub daily_attendance: Vec<DailyAttendance>,
    /// Visits grouped by date.
    pub care_list: Vec<CareListDay>,
    /// Problems found while computing the figures.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_profile_optional_fields_default() {
        let yaml = "name: Sakura Home Care\npay_day: 25\n";
        let company: CompanyProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(company.name, "Sakura Home Care");
        assert_eq!(company.address, "");
        assert_eq!(company.pay_day, 25);
    }

    #[test]
    fn test_payment_item_skips_missing_hours() {
        let item = PaymentItem {
            code: "allowance:transport".to_string(),
            label: "Transport".to_string(),
            hours: None,
            rate: None,
            amount: Decimal::new(5000, 0),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("hours"));
        assert!(!json.contains("rate"));
        assert!(json.contains("\"amount\":\"5000\""));
    }

    #[test]
    fn test_worker_profile_deserialization() {
        let json = r#"{"id": "helper_01", "name": "Yamada Hanako"}"#;
        let worker: WorkerProfile = serde_json::from_str(json).unwrap();
        assert_eq!(worker.id, "helper_01");
        assert!(worker.employee_number.is_none());
    }

    #[test]
    fn test_payslip_options_default_omits_cancelled() {
        let options: PayslipOptions = serde_json::from_str("{}").unwrap();
        assert!(!options.include_cancelled_in_care_list);
        assert_eq!(options, PayslipOptions::default());
    }
}
