//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the `/timesheet` and
//! `/payslip` endpoints and their conversion into domain types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calculation::parse_time_range;
use crate::models::{
    DeductionItem, Diagnostic, DiagnosticCode, PaymentItem, ServiceCategory, Severity, ShiftRecord,
    WorkerProfile,
};

/// Request body for the `/timesheet` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimesheetRequest {
    /// Payroll year.
    pub year: i32,
    /// Payroll month (1-12).
    pub month: u32,
    /// The workers to report on, in display order.
    pub workers: Vec<String>,
    /// Shift records for the month.
    #[serde(default)]
    pub shifts: Vec<ShiftRequest>,
}

/// Request body for the `/payslip` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipRequest {
    /// Payroll year.
    pub year: i32,
    /// Payroll month (1-12).
    pub month: u32,
    /// The worker being paid.
    pub worker: WorkerProfile,
    /// The worker's shifts; shifts without a `worker_id` are assigned to `worker`.
    #[serde(default)]
    pub shifts: Vec<ShiftRequest>,
    /// Allowances to append to the payments column.
    #[serde(default)]
    pub allowances: Vec<PaymentItem>,
    /// Deductions.
    #[serde(default)]
    pub deductions: Vec<DeductionItem>,
    /// List cancelled visits in the care list.
    #[serde(default)]
    pub include_cancelled_in_care_list: bool,
}

/// Shift information in a request.
///
/// Times are given either as `start_time`/`end_time` or as a spreadsheet-style
/// `time_range` such as `"9:00-12:30"`. Explicit times win when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Unique identifier for the shift.
    pub id: String,
    /// The date of the shift.
    pub date: NaiveDate,
    /// The worker who worked the shift.
    #[serde(default)]
    pub worker_id: String,
    /// Start time of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    /// End time of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    /// `"HH:MM-HH:MM"` range, used when explicit times are absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    /// The client visited.
    #[serde(default)]
    pub client_name: String,
    /// The kind of care delivered.
    pub service_category: ServiceCategory,
    /// Accompanying visit.
    #[serde(default)]
    pub is_accompanying: bool,
    /// Office work.
    #[serde(default)]
    pub is_office: bool,
    /// Sales work.
    #[serde(default)]
    pub is_sales: bool,
    /// Cancelled visit.
    #[serde(default)]
    pub is_cancelled: bool,
}

/// A shift that could not be converted, with the diagnostic explaining why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedShift {
    /// The worker the shift belonged to.
    pub worker_id: String,
    /// Why it was rejected.
    pub diagnostic: Diagnostic,
}

impl ShiftRequest {
    /// Converts the request into a [`ShiftRecord`].
    ///
    /// A missing or unparseable time range yields a [`RejectedShift`]; the
    /// shift is left out of every total.
    pub fn into_record(self) -> Result<ShiftRecord, RejectedShift> {
        let times = match (self.start_time, self.end_time, self.time_range.as_deref()) {
            (Some(start), Some(end), _) => Some((start, end)),
            (_, _, Some(range)) => parse_time_range(range),
            _ => None,
        };

        let Some((start, end)) = times else {
            let message = match &self.time_range {
                Some(range) => format!("unparseable time range '{}'", range),
                None => "shift has neither start/end times nor a time range".to_string(),
            };
            return Err(RejectedShift {
                worker_id: self.worker_id,
                diagnostic: Diagnostic::new(
                    DiagnosticCode::MalformedTimeRange,
                    Severity::Medium,
                    message,
                )
                .for_shift(self.id),
            });
        };

        Ok(ShiftRecord {
            id: self.id,
            date: self.date,
            start_time: start,
            end_time: end,
            worker_id: self.worker_id,
            client_name: self.client_name,
            service_category: self.service_category,
            is_accompanying: self.is_accompanying,
            is_office: self.is_office,
            is_sales: self.is_sales,
            is_cancelled: self.is_cancelled,
        })
    }
}

/// Converts request shifts, separating out the ones that cannot be priced.
pub fn convert_shifts(shifts: Vec<ShiftRequest>) -> (Vec<ShiftRecord>, Vec<RejectedShift>) {
    let mut records = Vec::with_capacity(shifts.len());
    let mut rejected = Vec::new();
    for shift in shifts {
        match shift.into_record() {
            Ok(record) => records.push(record),
            Err(rejection) => rejected.push(rejection),
        }
    }
    (records, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_time(time_str: &str) -> NaiveTime {
        NaiveTime::parse_from_str(time_str, "%H:%M").unwrap()
    }

    fn create_shift_request() -> ShiftRequest {
        ShiftRequest {
            id: "shift_001".to_string(),
            date: make_date("2025-03-05"),
            worker_id: "helper_01".to_string(),
            start_time: None,
            end_time: None,
            time_range: None,
            client_name: "Sato".to_string(),
            service_category: ServiceCategory::BodyCare,
            is_accompanying: false,
            is_office: false,
            is_sales: false,
            is_cancelled: false,
        }
    }

    #[test]
    fn test_explicit_times_convert() {
        let mut request = create_shift_request();
        request.start_time = Some(make_time("22:00"));
        request.end_time = Some(make_time("06:00"));

        let record = request.into_record().unwrap();
        assert_eq!(record.start_time, make_time("22:00"));
        assert_eq!(record.end_time, make_time("06:00"));
        assert_eq!(record.client_name, "Sato");
    }

    #[test]
    fn test_time_range_converts() {
        let mut request = create_shift_request();
        request.time_range = Some("9:00〜12:30".to_string());

        let record = request.into_record().unwrap();
        assert_eq!(record.start_time, make_time("09:00"));
        assert_eq!(record.end_time, make_time("12:30"));
    }

    #[test]
    fn test_malformed_time_range_is_rejected_with_diagnostic() {
        let mut request = create_shift_request();
        request.time_range = Some("morning".to_string());

        let rejected = request.into_record().unwrap_err();
        assert_eq!(rejected.worker_id, "helper_01");
        assert_eq!(rejected.diagnostic.code, DiagnosticCode::MalformedTimeRange);
        assert_eq!(rejected.diagnostic.shift_id.as_deref(), Some("shift_001"));
        assert!(rejected.diagnostic.message.contains("morning"));
    }

    #[test]
    fn test_missing_times_rejected() {
        let rejected = create_shift_request().into_record().unwrap_err();
        assert!(rejected.diagnostic.message.contains("neither"));
    }

    #[test]
    fn test_convert_shifts_splits_good_and_bad() {
        let mut good = create_shift_request();
        good.time_range = Some("09:00-10:00".to_string());
        let mut bad = create_shift_request();
        bad.id = "shift_002".to_string();
        bad.time_range = Some("9-10".to_string());

        let (records, rejected) = convert_shifts(vec![good, bad]);
        assert_eq!(records.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].diagnostic.shift_id.as_deref(), Some("shift_002"));
    }

    #[test]
    fn test_payslip_request_defaults() {
        let json = r#"{
            "year": 2025,
            "month": 3,
            "worker": {"id": "helper_01", "name": "Yamada Hanako"},
            "shifts": [
                {"id": "s1", "date": "2025-03-05", "time_range": "09:00-10:00", "service_category": "housework"}
            ]
        }"#;
        let request: PayslipRequest = serde_json::from_str(json).unwrap();
        assert!(request.allowances.is_empty());
        assert!(!request.include_cancelled_in_care_list);
        assert_eq!(request.shifts[0].worker_id, "");
    }
}
