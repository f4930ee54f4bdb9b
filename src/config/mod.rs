//! Configuration loading and management for the payroll engine.
//!
//! This module loads the agency's company profile and rate table from YAML
//! files. The engine itself never reads configuration on its own; callers pass
//! the resulting [`RateTable`] and [`CompanyProfile`](crate::models::CompanyProfile)
//! into every calculation.
//!
//! # Example
//!
//! ```no_run
//! use homecare_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded agency: {}", config.company().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AccompanyingRate, AgencyConfig, CategoryRate, MonthDay, NightPremium, RateTable,
    SpecialDateRate,
};

#[cfg(test)]
pub(crate) use types::sample_rate_table;
