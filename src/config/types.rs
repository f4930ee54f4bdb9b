//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{CompanyProfile, ServiceCategory};

/// How night-window minutes are priced relative to a base rate.
///
/// # Example
///
/// ```
/// use homecare_payroll::config::NightPremium;
/// use rust_decimal::Decimal;
///
/// let premium = NightPremium::Multiplier { factor: Decimal::new(125, 2) };
/// assert_eq!(premium.apply(Decimal::new(2000, 0)), Decimal::new(2500, 0));
///
/// let flat = NightPremium::Flat { rate: Decimal::new(1300, 0) };
/// assert_eq!(flat.apply(Decimal::new(2000, 0)), Decimal::new(1300, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NightPremium {
    /// Night rate is the base rate times `factor`.
    Multiplier {
        /// The multiplier (e.g. 1.25).
        factor: Decimal,
    },
    /// Night rate is a fixed hourly amount.
    Flat {
        /// The hourly night rate.
        rate: Decimal,
    },
}

impl NightPremium {
    /// Returns the night rate for the given base rate.
    pub fn apply(&self, base_rate: Decimal) -> Decimal {
        match self {
            NightPremium::Multiplier { factor } => base_rate * factor,
            NightPremium::Flat { rate } => *rate,
        }
    }

    fn value(&self) -> Decimal {
        match self {
            NightPremium::Multiplier { factor } => *factor,
            NightPremium::Flat { rate } => *rate,
        }
    }
}

/// Rate for one service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRate {
    /// Hourly rate outside the night window.
    pub base_rate: Decimal,
    /// Explicit night pricing; the table-wide night multiplier applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night: Option<NightPremium>,
}

/// Rate for accompanying visits.
///
/// The night premium is deliberately a required entry: agencies price it
/// differently and there is no safe default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccompanyingRate {
    /// Hourly rate outside the night window.
    pub base_rate: Decimal,
    /// Night-window pricing.
    pub night: NightPremium,
}

/// A calendar day that recurs every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthDay {
    /// Month, 1-12.
    pub month: u32,
    /// Day of month.
    pub day: u32,
}

impl MonthDay {
    /// Whether `date` falls on this month and day.
    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

fn default_special_dates() -> Vec<MonthDay> {
    vec![
        MonthDay { month: 12, day: 31 },
        MonthDay { month: 1, day: 1 },
        MonthDay { month: 1, day: 2 },
        MonthDay { month: 1, day: 3 },
        MonthDay { month: 1, day: 4 },
    ]
}

/// Flat rate applied on year-end / New-Year dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDateRate {
    /// Hourly rate for both day and night minutes.
    pub rate: Decimal,
    /// The dates the rate applies on (Dec 31 and Jan 1-4 when omitted).
    #[serde(default = "default_special_dates")]
    pub dates: Vec<MonthDay>,
}

fn default_night_multiplier() -> Decimal {
    Decimal::new(125, 2)
}

/// The agency's rate table, loaded from `rates.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Night premium used where no explicit night pricing is configured.
    #[serde(default = "default_night_multiplier")]
    pub night_multiplier: Decimal,
    /// Standard rates by service category.
    pub categories: BTreeMap<ServiceCategory, CategoryRate>,
    /// Accompanying visit rates.
    pub accompanying: AccompanyingRate,
    /// Flat hourly rate for office work.
    pub office_rate: Decimal,
    /// Flat hourly rate for sales work.
    pub sales_rate: Decimal,
    /// Year-end / New-Year override.
    pub special_date: SpecialDateRate,
}

impl RateTable {
    /// Returns the standard rate for a category, if configured.
    pub fn category_rate(&self, category: ServiceCategory) -> Option<&CategoryRate> {
        self.categories.get(&category)
    }

    /// Whether the special-date rate applies on `date`.
    pub fn is_special_date(&self, date: NaiveDate) -> bool {
        self.special_date.dates.iter().any(|d| d.matches(date))
    }

    /// Checks every rate and multiplier is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> EngineResult<()> {
        non_negative("night_multiplier", self.night_multiplier)?;
        for (category, rate) in &self.categories {
            non_negative(&format!("categories.{}.base_rate", category), rate.base_rate)?;
            if let Some(night) = rate.night {
                non_negative(&format!("categories.{}.night", category), night.value())?;
            }
        }
        non_negative("accompanying.base_rate", self.accompanying.base_rate)?;
        non_negative("accompanying.night", self.accompanying.night.value())?;
        non_negative("office_rate", self.office_rate)?;
        non_negative("sales_rate", self.sales_rate)?;
        non_negative("special_date.rate", self.special_date.rate)?;

        for date in &self.special_date.dates {
            // 2024 is a leap year, so Feb 29 is accepted.
            if NaiveDate::from_ymd_opt(2024, date.month, date.day).is_none() {
                return Err(EngineError::InvalidConfig {
                    field: "special_date.dates".to_string(),
                    message: format!("{}-{} is not a calendar day", date.month, date.day),
                });
            }
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::InvalidConfig {
            field: field.to_string(),
            message: format!("must not be negative (got {})", value),
        });
    }
    Ok(())
}

/// The complete agency configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencyConfig {
    company: CompanyProfile,
    rates: RateTable,
}

impl AgencyConfig {
    /// Creates a validated configuration from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when a rate is negative, a
    /// special date does not exist or `pay_day` is outside 1-31.
    pub fn new(company: CompanyProfile, rates: RateTable) -> EngineResult<Self> {
        if !(1..=31).contains(&company.pay_day) {
            return Err(EngineError::InvalidConfig {
                field: "pay_day".to_string(),
                message: format!("must be between 1 and 31 (got {})", company.pay_day),
            });
        }
        rates.validate()?;
        Ok(Self { company, rates })
    }

    /// Returns the company profile.
    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    /// Returns the rate table.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }
}

/// A rate table with round numbers for unit tests.
#[cfg(test)]
pub(crate) fn sample_rate_table() -> RateTable {
    let mut categories = BTreeMap::new();
    categories.insert(
        ServiceCategory::BodyCare,
        CategoryRate {
            base_rate: Decimal::new(2000, 0),
            night: None,
        },
    );
    categories.insert(
        ServiceCategory::Housework,
        CategoryRate {
            base_rate: Decimal::new(1600, 0),
            night: None,
        },
    );
    categories.insert(
        ServiceCategory::OutingEscort,
        CategoryRate {
            base_rate: Decimal::new(1800, 0),
            night: None,
        },
    );
    categories.insert(
        ServiceCategory::SevereCare,
        CategoryRate {
            base_rate: Decimal::new(1500, 0),
            night: Some(NightPremium::Flat {
                rate: Decimal::new(1800, 0),
            }),
        },
    );

    RateTable {
        night_multiplier: Decimal::new(125, 2),
        categories,
        accompanying: AccompanyingRate {
            base_rate: Decimal::new(1200, 0),
            night: NightPremium::Multiplier {
                factor: Decimal::new(110, 2),
            },
        },
        office_rate: Decimal::new(1100, 0),
        sales_rate: Decimal::new(1300, 0),
        special_date: SpecialDateRate {
            rate: Decimal::new(3000, 0),
            dates: default_special_dates(),
        },
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

    fn sample_company() -> CompanyProfile {
        CompanyProfile {
            name: "Sakura Home Care".to_string(),
            address: String::new(),
            phone: String::new(),
            representative: String::new(),
            pay_day: 25,
        }
    }

    #[test]
    fn test_default_special_dates_cover_year_end() {
        let table = sample_rate_table();
        assert!(table.is_special_date(make_date("2025-12-31")));
        assert!(table.is_special_date(make_date("2026-01-01")));
        assert!(table.is_special_date(make_date("2026-01-04")));
        assert!(!table.is_special_date(make_date("2026-01-05")));
        assert!(!table.is_special_date(make_date("2025-12-30")));
    }

    #[test]
    fn test_rate_table_from_yaml_uses_defaults() {
        let yaml = r#"
categories:
  body_care:
    base_rate: 2000
  severe_care:
    base_rate: 1500
    night:
      kind: flat
      rate: 1800
accompanying:
  base_rate: 1200
  night:
    kind: multiplier
    factor: 1.1
office_rate: 1100
sales_rate: 1300
special_date:
  rate: 3000
"#;
        let table: RateTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.night_multiplier, dec("1.25"));
        assert_eq!(table.special_date.dates.len(), 5);
        assert_eq!(
            table.category_rate(ServiceCategory::SevereCare).unwrap().night,
            Some(NightPremium::Flat { rate: dec("1800") })
        );
        assert!(table.category_rate(ServiceCategory::Other).is_none());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let mut table = sample_rate_table();
        table.office_rate = dec("-1");
        match table.validate() {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, "office_rate"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_category_night() {
        let mut table = sample_rate_table();
        table.categories.insert(
            ServiceCategory::Other,
            CategoryRate {
                base_rate: dec("1000"),
                night: Some(NightPremium::Multiplier { factor: dec("-1.25") }),
            },
        );
        match table.validate() {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "categories.other.night")
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_impossible_special_date() {
        let mut table = sample_rate_table();
        table.special_date.dates.push(MonthDay { month: 2, day: 30 });
        assert!(matches!(
            table.validate(),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_agency_config_rejects_bad_pay_day() {
        let mut company = sample_company();
        company.pay_day = 0;
        let result = AgencyConfig::new(company, sample_rate_table());
        match result {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, "pay_day"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_agency_config_accessors() {
        let config = AgencyConfig::new(sample_company(), sample_rate_table()).unwrap();
        assert_eq!(config.company().name, "Sakura Home Care");
        assert_eq!(config.rates().office_rate, dec("1100"));
    }
}
