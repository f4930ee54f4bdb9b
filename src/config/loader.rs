//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading agency
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::CompanyProfile;

use super::types::{AgencyConfig, RateTable};

/// Loads and provides access to agency configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── agency.yaml   # Company profile printed on payslips
/// └── rates.yaml    # Hourly rates, night premiums, special dates
/// ```
///
/// # Example
///
/// ```no_run
/// use homecare_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Agency: {}", loader.company().name);
/// # Ok::<(), homecare_payroll::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AgencyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] if `agency.yaml` or `rates.yaml` is missing
    /// - [`EngineError::ConfigParseError`] if a file is not valid YAML for its type
    /// - [`EngineError::InvalidConfig`] if a value fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let company = Self::load_yaml::<CompanyProfile>(&path.join("agency.yaml"))?;
        let rates = Self::load_yaml::<RateTable>(&path.join("rates.yaml"))?;

        let config = AgencyConfig::new(company, rates)?;
        tracing::debug!(
            path = %path.display(),
            agency = %config.company().name,
            categories = config.rates().categories.len(),
            "Loaded agency configuration"
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AgencyConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying agency configuration.
    pub fn config(&self) -> &AgencyConfig {
        &self.config
    }

    /// Returns the company profile.
    pub fn company(&self) -> &CompanyProfile {
        self.config.company()
    }

    /// Returns the rate table.
    pub fn rates(&self) -> &RateTable {
        self.config.rates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NightPremium;
    use crate::models::ServiceCategory;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.company().name, "Sakura Home Care");
        assert_eq!(loader.company().pay_day, 25);
    }

    #[test]
    fn test_default_rates_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let rates = loader.rates();

        assert_eq!(rates.night_multiplier, dec("1.25"));
        assert_eq!(
            rates.category_rate(ServiceCategory::BodyCare).unwrap().base_rate,
            dec("2000")
        );
        assert_eq!(
            rates.accompanying.night,
            NightPremium::Multiplier { factor: dec("1.0") }
        );
        assert_eq!(rates.special_date.rate, dec("3000"));
        assert!(rates.is_special_date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
    }

    #[test]
    fn test_other_category_left_unconfigured() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert!(loader.rates().category_rate(ServiceCategory::Other).is_none());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("agency.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_yaml_reports_parse_errors() {
        let dir = std::env::temp_dir().join(format!("homecare-payroll-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("agency.yaml"), "name: Broken\npay_day: 25\n").unwrap();
        fs::write(dir.join("rates.yaml"), "categories: [not, a, map]\n").unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("rates.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
