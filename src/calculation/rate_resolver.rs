//! Hourly rate resolution.
//!
//! Rates are chosen by an ordered list of [`RatePolicy`] values. The first
//! policy that applies to a shift prices both its daytime and night minutes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateTable;
use crate::models::{Diagnostic, DiagnosticCode, PayCategory, ServiceCategory, Severity, ShiftRecord};

/// The shift attributes that decide its rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateContext {
    /// The kind of care delivered.
    pub service_category: ServiceCategory,
    /// Accompanying visit flag.
    pub is_accompanying: bool,
    /// Office work flag.
    pub is_office: bool,
    /// Sales work flag.
    pub is_sales: bool,
    /// The shift date.
    pub date: NaiveDate,
}

impl RateContext {
    /// Office work, either flagged or recorded under the office category.
    pub fn is_office_work(&self) -> bool {
        self.is_office || self.service_category == ServiceCategory::Office
    }

    /// Sales work, either flagged or recorded under the sales category.
    pub fn is_sales_work(&self) -> bool {
        self.is_sales || self.service_category == ServiceCategory::Sales
    }
}

impl From<&ShiftRecord> for RateContext {
    fn from(shift: &ShiftRecord) -> Self {
        Self {
            service_category: shift.service_category,
            is_accompanying: shift.is_accompanying,
            is_office: shift.is_office,
            is_sales: shift.is_sales,
            date: shift.date,
        }
    }
}

/// The rates selected for one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRate {
    /// Hourly rate for daytime minutes.
    pub regular_rate: Decimal,
    /// Hourly rate for night-window minutes.
    pub night_rate: Decimal,
    /// The policy that produced the rates.
    pub category: PayCategory,
    /// Set when the rate table had no usable entry.
    pub diagnostic: Option<Diagnostic>,
}

impl ResolvedRate {
    fn flat(category: PayCategory, regular_rate: Decimal, night_rate: Decimal) -> Self {
        Self {
            regular_rate,
            night_rate,
            category,
            diagnostic: None,
        }
    }
}

/// A rule that can price a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePolicy {
    /// Year-end / New-Year dates pay one flat rate for every minute.
    SpecialDate,
    /// Office or sales work pays its flat rate; night minutes get the night multiplier.
    OfficeOrSales,
    /// Accompanying visits pay the accompanying rate.
    Accompanying,
    /// The service category's own rate.
    Standard,
}

impl RatePolicy {
    /// Policies in the order they are tried.
    pub const ORDER: [RatePolicy; 4] = [
        RatePolicy::SpecialDate,
        RatePolicy::OfficeOrSales,
        RatePolicy::Accompanying,
        RatePolicy::Standard,
    ];

    /// Whether this policy prices the given shift.
    pub fn applies(&self, context: &RateContext, rates: &RateTable) -> bool {
        match self {
            RatePolicy::SpecialDate => rates.is_special_date(context.date),
            RatePolicy::OfficeOrSales => context.is_office_work() || context.is_sales_work(),
            RatePolicy::Accompanying => context.is_accompanying,
            RatePolicy::Standard => true,
        }
    }

    /// Prices the shift under this policy.
    pub fn resolve(&self, context: &RateContext, rates: &RateTable) -> ResolvedRate {
        match self {
            RatePolicy::SpecialDate => {
                let rate = rates.special_date.rate;
                ResolvedRate::flat(PayCategory::SpecialDate, rate, rate)
            }
            RatePolicy::OfficeOrSales => {
                let (category, rate) = if context.is_office_work() {
                    (PayCategory::Office, rates.office_rate)
                } else {
                    (PayCategory::Sales, rates.sales_rate)
                };
                ResolvedRate::flat(category, rate, rate * rates.night_multiplier)
            }
            RatePolicy::Accompanying => {
                let accompanying = &rates.accompanying;
                ResolvedRate::flat(
                    PayCategory::Accompanying,
                    accompanying.base_rate,
                    accompanying.night.apply(accompanying.base_rate),
                )
            }
            RatePolicy::Standard => match rates.category_rate(context.service_category) {
                Some(entry) => {
                    let night_rate = match &entry.night {
                        Some(premium) => premium.apply(entry.base_rate),
                        None => entry.base_rate * rates.night_multiplier,
                    };
                    ResolvedRate::flat(PayCategory::Standard, entry.base_rate, night_rate)
                }
                None => ResolvedRate {
                    regular_rate: Decimal::ZERO,
                    night_rate: Decimal::ZERO,
                    category: PayCategory::Standard,
                    diagnostic: Some(Diagnostic::new(
                        DiagnosticCode::MissingRate,
                        Severity::Medium,
                        format!(
                            "no rate configured for service category '{}'",
                            context.service_category
                        ),
                    )),
                },
            },
        }
    }
}

/// Selects the regular and night rates for a shift.
///
/// Policies are tried in [`RatePolicy::ORDER`]; the first one that applies
/// wins. A service category missing from the rate table resolves to a zero
/// rate with a [`DiagnosticCode::MissingRate`] diagnostic instead of an error.
///
/// # Arguments
///
/// * `context` - The shift attributes that decide the rate
/// * `rates` - The agency's rate table
///
/// # Example
///
/// ```
/// use homecare_payroll::calculation::{resolve_rate, RateContext};
/// use homecare_payroll::config::ConfigLoader;
/// use homecare_payroll::models::{PayCategory, ServiceCategory};
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let context = RateContext {
///     service_category: ServiceCategory::BodyCare,
///     is_accompanying: true,
///     is_office: false,
///     is_sales: false,
///     date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
/// };
///
/// // The year-end rate outranks the accompanying flag.
/// let resolved = resolve_rate(&context, loader.rates());
/// assert_eq!(resolved.category, PayCategory::SpecialDate);
/// assert_eq!(resolved.regular_rate, resolved.night_rate);
/// ```
pub fn resolve_rate(context: &RateContext, rates: &RateTable) -> ResolvedRate {
    let policy = RatePolicy::ORDER
        .into_iter()
        .find(|policy| policy.applies(context, rates))
        .unwrap_or(RatePolicy::Standard);
    policy.resolve(context, rates)
}
