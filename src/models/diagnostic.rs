//! Non-fatal diagnostics raised while computing payroll.
//!
//! One malformed record must never prevent payroll for the rest of a
//! worker's shifts, so problems are collected as [`Diagnostic`] values and
//! returned alongside the result instead of aborting the calculation.

use serde::{Deserialize, Serialize};

/// Identifies the kind of problem a [`Diagnostic`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// A time range could not be parsed; the shift is left out of every total.
    MalformedTimeRange,
    /// The rate table has no entry for the shift's service category.
    MissingRate,
    /// The shift date fell in no week bucket and was left out of the totals.
    OutsideWeekRange,
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticCode::MalformedTimeRange => write!(f, "malformed_time_range"),
            DiagnosticCode::MissingRate => write!(f, "missing_rate"),
            DiagnosticCode::OutsideWeekRange => write!(f, "outside_week_range"),
        }
    }
}

/// How much attention a diagnostic needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; totals are unaffected.
    Low,
    /// Totals are lower than they would be with complete data.
    Medium,
    /// A shift was dropped entirely.
    High,
}

/// A problem found in the input that was handled with a safe default.
///
/// # Example
///
/// ```
/// use homecare_payroll::models::{Diagnostic, DiagnosticCode, Severity};
///
/// let diagnostic = Diagnostic::new(
///     DiagnosticCode::MissingRate,
///     Severity::Medium,
///     "no rate configured for 'other'",
/// )
/// .for_shift("shift_001");
///
/// assert_eq!(diagnostic.shift_id.as_deref(), Some("shift_001"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub code: DiagnosticCode,
    /// How serious it is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// The shift the diagnostic refers to, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic that is not tied to a shift.
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            shift_id: None,
        }
    }

    /// Attaches the originating shift id.
    pub fn for_shift(mut self, shift_id: impl Into<String>) -> Self {
        self.shift_id = Some(shift_id.into());
        self
    }
}
