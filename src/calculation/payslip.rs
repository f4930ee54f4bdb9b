//! Payslip assembly.
//!
//! Turns one worker's aggregated month into a [`PayslipData`] document:
//! itemized payments, externally supplied allowances and deductions, an
//! attendance summary, the attendance matrix and a care list.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    AttendanceSummary, CareListDay, CareListEntry, CompanyProfile, DeductionItem, PayCategory,
    PayPeriod, PaymentItem, PayslipData, PayslipOptions, ServiceCategory, ShiftRecord,
    WorkerMonth, WorkerProfile,
};

use super::calendar::last_day_of_month;
use super::time_interval::TimeInterval;

/// Everything a payslip is built from.
#[derive(Debug, Clone, Copy)]
pub struct PayslipInput<'a> {
    /// Issuing agency.
    pub company: &'a CompanyProfile,
    /// The worker being paid.
    pub worker: &'a WorkerProfile,
    /// The worker's aggregated month.
    pub month: &'a WorkerMonth,
    /// The pay period the month was aggregated over.
    pub period: &'a PayPeriod,
    /// Shift records for the care list; other workers' shifts are ignored.
    pub shifts: &'a [ShiftRecord],
    /// Allowances appended to the payments column as given.
    pub allowances: &'a [PaymentItem],
    /// Deductions, as given.
    pub deductions: &'a [DeductionItem],
    /// Assembly switches.
    pub options: PayslipOptions,
}

/// Builds a payslip for one worker.
///
/// Pay lines from the worker's shifts are grouped by rate policy, service
/// category, day/night and rate. Each group becomes one [`PaymentItem`] whose
/// amount is rounded to whole currency units, half away from zero. Totals are
/// sums of the rounded items, so `net_pay == total_payments - total_deductions`
/// holds exactly.
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::{aggregate_month, assemble_payslip, PayslipInput};
/// use homecare_payroll::config::ConfigLoader;
/// use homecare_payroll::models::{
///     DeductionItem, PayslipOptions, ServiceCategory, ShiftRecord, WorkerProfile,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
/// let shifts = vec![ShiftRecord::from_time_range(
///     "s1", "helper_01", date, "09:00-12:00", ServiceCategory::BodyCare,
/// )?];
/// let timesheet = aggregate_month(&shifts, &["helper_01"], loader.rates(), 2025, 3)?;
///
/// let worker = WorkerProfile {
///     id: "helper_01".to_string(),
///     name: "Yamada Hanako".to_string(),
///     employee_number: None,
///     department: None,
/// };
/// let deductions = vec![DeductionItem {
///     code: "income_tax".to_string(),
///     label: "Income tax".to_string(),
///     amount: Decimal::new(300, 0),
/// }];
///
/// let payslip = assemble_payslip(&PayslipInput {
///     company: loader.company(),
///     worker: &worker,
///     month: timesheet.worker("helper_01").unwrap(),
///     period: &timesheet.period,
///     shifts: &shifts,
///     allowances: &[],
///     deductions: &deductions,
///     options: PayslipOptions::default(),
/// });
///
/// assert_eq!(payslip.total_payments, Decimal::new(6000, 0));
/// assert_eq!(payslip.net_pay, Decimal::new(5700, 0));
/// assert_eq!(payslip.payment_date, NaiveDate::from_ymd_opt(2025, 4, 25).unwrap());
/// # Ok::<(), homecare_payroll::error::EngineError>(())
/// ```
pub fn assemble_payslip(input: &PayslipInput<'_>) -> PayslipData {
    let mut payments = payment_items(input.month);
    payments.extend(input.allowances.iter().cloned());

    let total_payments: Decimal = payments.iter().map(|item| item.amount).sum();
    let total_deductions: Decimal = input.deductions.iter().map(|item| item.amount).sum();

    let care_list = care_list(
        &input.worker.id,
        input.period,
        input.shifts,
        input.options.include_cancelled_in_care_list,
    );

    tracing::debug!(
        worker_id = %input.worker.id,
        payments = payments.len(),
        deductions = input.deductions.len(),
        total_payments = %total_payments,
        total_deductions = %total_deductions,
        "Assembled payslip"
    );

    PayslipData {
        company: input.company.clone(),
        worker: input.worker.clone(),
        period: *input.period,
        payment_date: payment_date(input.period, input.company.pay_day),
        attendance: attendance_summary(input.month),
        payments,
        deductions: input.deductions.to_vec(),
        total_payments,
        total_deductions,
        net_pay: total_payments - total_deductions,
        daily_attendance: input.month.daily_attendance.clone(),
        care_list,
        diagnostics: input.month.diagnostics.clone(),
    }
}

/// The wage payment date: `pay_day` of the month after the payroll month,
/// clamped to that month's length.
///
/// ```
/// use homecare_payroll::calculation::{payment_date, payroll_period};
/// use chrono::NaiveDate;
///
/// let january = payroll_period(2025, 1).unwrap();
/// assert_eq!(payment_date(&january, 31), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
///
/// let december = payroll_period(2025, 12).unwrap();
/// assert_eq!(payment_date(&december, 25), NaiveDate::from_ymd_opt(2026, 1, 25).unwrap());
/// ```
pub fn payment_date(period: &PayPeriod, pay_day: u32) -> NaiveDate {
    let (year, month) = if period.month == 12 {
        (period.year + 1, 1)
    } else {
        (period.year, period.month + 1)
    };
    last_day_of_month(year, month)
        .and_then(|last| last.with_day(pay_day.clamp(1, last.day())))
        .unwrap_or(period.end_date)
}

/// Rounds to whole currency units, half away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ItemKey {
    category: PayCategory,
    service_category: Option<ServiceCategory>,
    is_night: bool,
    rate: Decimal,
}

impl ItemKey {
    fn code(&self) -> String {
        let part = if self.is_night { "night" } else { "day" };
        match (self.category, self.service_category) {
            (PayCategory::SpecialDate, _) => "special_date".to_string(),
            (PayCategory::Standard, Some(service)) => format!("standard:{}:{}", service, part),
            (category, _) => format!("{}:{}", category_key(category), part),
        }
    }

    fn label(&self) -> String {
        let base = match (self.category, self.service_category) {
            (PayCategory::SpecialDate, _) => return "Year-end holiday".to_string(),
            (PayCategory::Standard, Some(service)) => service.label().to_string(),
            (category, _) => category.to_string(),
        };
        if self.is_night {
            format!("{} (night)", base)
        } else {
            base
        }
    }
}

fn category_key(category: PayCategory) -> &'static str {
    match category {
        PayCategory::SpecialDate => "special_date",
        PayCategory::Office => "office",
        PayCategory::Sales => "sales",
        PayCategory::Accompanying => "accompanying",
        PayCategory::Standard => "standard",
    }
}

/// Groups the month's pay lines into rounded payment items.
fn payment_items(month: &WorkerMonth) -> Vec<PaymentItem> {
    let mut groups: BTreeMap<ItemKey, (Decimal, Decimal)> = BTreeMap::new();

    for line in month.shift_results.iter().flat_map(|r| r.pay_lines.iter()) {
        let key = ItemKey {
            category: line.category,
            service_category: (line.category == PayCategory::Standard)
                .then_some(line.service_category),
            is_night: line.is_night && line.category != PayCategory::SpecialDate,
            rate: line.rate,
        };
        let entry = groups.entry(key).or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += line.hours;
        entry.1 += line.amount;
    }

    groups
        .into_iter()
        .map(|(key, (hours, amount))| PaymentItem {
            code: key.code(),
            label: key.label(),
            hours: Some(hours),
            rate: Some(key.rate),
            amount: round_currency(amount),
        })
        .collect()
}

fn attendance_summary(month: &WorkerMonth) -> AttendanceSummary {
    let hours = &month.attendance_hours;
    AttendanceSummary {
        working_days: month
            .daily_attendance
            .iter()
            .filter(|day| day.shift_count > 0)
            .count() as u32,
        shift_count: month.shift_results.len() as u32,
        cancelled_shift_count: month.cancelled_shift_count,
        total_hours: hours.total(),
        regular_hours: hours.regular,
        night_hours: hours.night,
        accompanying_hours: hours.accompanying,
        accompanying_night_hours: hours.accompanying_night,
        office_hours: hours.office,
        sales_hours: hours.sales,
    }
}

fn care_list(
    worker_id: &str,
    period: &PayPeriod,
    shifts: &[ShiftRecord],
    include_cancelled: bool,
) -> Vec<CareListDay> {
    let mut days: BTreeMap<NaiveDate, Vec<&ShiftRecord>> = BTreeMap::new();
    for shift in shifts {
        if shift.worker_id != worker_id || !period.contains_date(shift.date) {
            continue;
        }
        if shift.is_cancelled && !include_cancelled {
            continue;
        }
        days.entry(shift.date).or_default().push(shift);
    }

    days.into_iter()
        .map(|(date, mut visits)| {
            visits.sort_by(|a, b| (a.start_time, &a.id).cmp(&(b.start_time, &b.id)));
            CareListDay {
                date,
                entries: visits
                    .into_iter()
                    .map(|shift| CareListEntry {
                        shift_id: shift.id.clone(),
                        client_name: shift.client_name.clone(),
                        service_category: shift.service_category,
                        time_range: shift.time_range_label(),
                        hours: TimeInterval::from_times(shift.start_time, shift.end_time)
                            .duration_hours(),
                        is_cancelled: shift.is_cancelled,
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::aggregate_month;
    use crate::config::sample_rate_table;
    use crate::models::MonthlyTimesheet;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_shift(id: &str, date: &str, range: &str, category: ServiceCategory) -> ShiftRecord {
        ShiftRecord::from_time_range(id, "helper_01", make_date(date), range, category)
            .unwrap()
            .with_client("Sato")
    }

    fn company() -> CompanyProfile {
        CompanyProfile {
            name: "Sakura Home Care".to_string(),
            address: String::new(),
            phone: String::new(),
            representative: String::new(),
            pay_day: 25,
        }
    }

    fn worker() -> WorkerProfile {
        WorkerProfile {
            id: "helper_01".to_string(),
            name: "Yamada Hanako".to_string(),
            employee_number: Some("E-001".to_string()),
            department: None,
        }
    }

    fn timesheet(shifts: &[ShiftRecord], year: i32, month: u32) -> MonthlyTimesheet {
        aggregate_month(shifts, &["helper_01"], &sample_rate_table(), year, month).unwrap()
    }

    fn build(
        shifts: &[ShiftRecord],
        sheet: &MonthlyTimesheet,
        allowances: &[PaymentItem],
        deductions: &[DeductionItem],
        options: PayslipOptions,
    ) -> PayslipData {
        let company = company();
        let worker = worker();
        assemble_payslip(&PayslipInput {
            company: &company,
            worker: &worker,
            month: &sheet.workers[0],
            period: &sheet.period,
            shifts,
            allowances,
            deductions,
            options,
        })
    }

    #[test]
    fn test_payment_items_grouped_by_category_and_night() {
        let shifts = vec![
            create_shift("s1", "2025-03-03", "20:00-23:00", ServiceCategory::BodyCare),
            create_shift("s2", "2025-03-04", "09:00-10:00", ServiceCategory::BodyCare),
            create_shift("s3", "2025-03-05", "09:00-11:00", ServiceCategory::Housework),
            create_shift("s4", "2025-03-06", "09:00-10:00", ServiceCategory::Housework).office(),
        ];
        let sheet = timesheet(&shifts, 2025, 3);
        let payslip = build(&shifts, &sheet, &[], &[], PayslipOptions::default());

        let codes: Vec<&str> = payslip.payments.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "office:day",
                "standard:body_care:day",
                "standard:body_care:night",
                "standard:housework:day",
            ]
        );

        let body_day = &payslip.payments[1];
        assert_eq!(body_day.hours, Some(dec("3")));
        assert_eq!(body_day.rate, Some(dec("2000")));
        assert_eq!(body_day.amount, dec("6000"));
        assert_eq!(payslip.payments[2].label, "Body care (night)");

        // 6000 + 2500 + 3200 + 1100
        assert_eq!(payslip.total_payments, dec("12800"));
    }

    #[test]
    fn test_special_date_collapses_day_and_night() {
        let shifts = vec![create_shift("s1", "2025-12-31", "20:00-23:00", ServiceCategory::BodyCare)];
        let sheet = timesheet(&shifts, 2025, 12);
        let payslip = build(&shifts, &sheet, &[], &[], PayslipOptions::default());
        assert_eq!(payslip.payments.len(), 1);
        assert_eq!(payslip.payments[0].code, "special_date");
        assert_eq!(payslip.payments[0].amount, dec("9000"));
    }

    #[test]
    fn test_items_rounded_half_away_from_zero() {
        let shifts = vec![
            create_shift("s1", "2025-03-03", "09:00-09:20", ServiceCategory::Housework),
            create_shift("s2", "2025-03-04", "09:00-09:10", ServiceCategory::Housework),
        ];
        let sheet = timesheet(&shifts, 2025, 3);
        let payslip = build(&shifts, &sheet, &[], &[], PayslipOptions::default());
        // 533.33 + 266.67 rounds to 800
        assert_eq!(payslip.payments[0].amount, dec("800"));
        assert_eq!(payslip.payments[0].hours, Some(dec("0.5")));
        assert_eq!(payslip.attendance.total_hours, dec("0.5"));

        assert_eq!(round_currency(dec("100.5")), dec("101"));
        assert_eq!(round_currency(dec("-100.5")), dec("-101"));
        assert_eq!(round_currency(dec("100.49")), dec("100"));
    }

    #[test]
    fn test_allowances_and_deductions() {
        let shifts = vec![create_shift("s1", "2025-03-03", "09:00-12:00", ServiceCategory::BodyCare)];
        let sheet = timesheet(&shifts, 2025, 3);
        let allowances = vec![PaymentItem {
            code: "allowance:transport".to_string(),
            label: "Transport".to_string(),
            hours: None,
            rate: None,
            amount: dec("1500"),
        }];
        let deductions = vec![
            DeductionItem {
                code: "health_insurance".to_string(),
                label: "Health insurance".to_string(),
                amount: dec("800"),
            },
            DeductionItem {
                code: "income_tax".to_string(),
                label: "Income tax".to_string(),
                amount: dec("200"),
            },
        ];
        let payslip = build(&shifts, &sheet, &allowances, &deductions, PayslipOptions::default());

        assert_eq!(payslip.payments.last().unwrap().code, "allowance:transport");
        assert_eq!(payslip.total_payments, dec("7500"));
        assert_eq!(payslip.total_deductions, dec("1000"));
        assert_eq!(payslip.net_pay, dec("6500"));
        assert_eq!(payslip.deductions.len(), 2);
    }

    #[test]
    fn test_attendance_summary() {
        let shifts = vec![
            create_shift("s1", "2025-03-03", "20:00-23:00", ServiceCategory::BodyCare),
            create_shift("s2", "2025-03-03", "06:00-07:00", ServiceCategory::BodyCare).accompanying(),
            create_shift("s3", "2025-03-10", "09:00-10:00", ServiceCategory::BodyCare).cancelled(),
        ];
        let sheet = timesheet(&shifts, 2025, 3);
        let payslip = build(&shifts, &sheet, &[], &[], PayslipOptions::default());
        let attendance = &payslip.attendance;

        assert_eq!(attendance.working_days, 1);
        assert_eq!(attendance.shift_count, 2);
        assert_eq!(attendance.cancelled_shift_count, 1);
        assert_eq!(attendance.regular_hours, dec("2"));
        assert_eq!(attendance.night_hours, dec("1"));
        assert_eq!(attendance.accompanying_night_hours, dec("1"));
        assert_eq!(attendance.total_hours, dec("4"));
    }

    #[test]
    fn test_care_list_grouped_by_date_and_sorted() {
        let shifts = vec![
            create_shift("s2", "2025-03-03", "13:00-14:00", ServiceCategory::Housework),
            create_shift("s1", "2025-03-03", "09:00-10:30", ServiceCategory::BodyCare),
            create_shift("s3", "2025-03-04", "09:00-10:00", ServiceCategory::BodyCare).cancelled(),
        ];
        let sheet = timesheet(&shifts, 2025, 3);

        let payslip = build(&shifts, &sheet, &[], &[], PayslipOptions::default());
        assert_eq!(payslip.care_list.len(), 1);
        let day = &payslip.care_list[0];
        assert_eq!(day.entries[0].shift_id, "s1");
        assert_eq!(day.entries[0].time_range, "09:00-10:30");
        assert_eq!(day.entries[0].hours, dec("1.5"));

        let options = PayslipOptions {
            include_cancelled_in_care_list: true,
        };
        let payslip = build(&shifts, &sheet, &[], &[], options);
        assert_eq!(payslip.care_list.len(), 2);
        assert!(payslip.care_list[1].entries[0].is_cancelled);
    }

    #[test]
    fn test_payment_date_clamped_to_month_length() {
        let period = crate::calculation::payroll_period(2024, 1).unwrap();
        assert_eq!(payment_date(&period, 31), make_date("2024-02-29"));
        assert_eq!(payment_date(&period, 10), make_date("2024-02-10"));
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let shifts = vec![
            create_shift("s1", "2025-03-03", "20:00-23:00", ServiceCategory::BodyCare),
            create_shift("s2", "2025-03-04", "22:00-06:00", ServiceCategory::SevereCare),
        ];
        let sheet = timesheet(&shifts, 2025, 3);
        let first = build(&shifts, &sheet, &[], &[], PayslipOptions::default());
        let second = build(&shifts, &sheet, &[], &[], PayslipOptions::default());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
