//! Error types for the payroll engine.
//!
//! Hard failures are rare in this crate: malformed shift data and rate gaps
//! are reported as [`Diagnostic`](crate::models::Diagnostic) values instead.
//! [`EngineError`] covers configuration problems, invalid payroll periods and
//! input that cannot be turned into a [`ShiftRecord`](crate::models::ShiftRecord).

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use homecare_payroll::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rates.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rates.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but contains a value the engine cannot use.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The requested payroll month does not exist.
    #[error("Invalid payroll period {year}-{month}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month (expected 1-12).
        month: u32,
    },

    /// A shift could not be built from the supplied data.
    #[error("Invalid shift '{shift_id}': {message}")]
    InvalidShift {
        /// The ID of the invalid shift.
        shift_id: String,
        /// A description of what made the shift invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
