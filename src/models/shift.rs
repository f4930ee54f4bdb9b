//! Shift record model.
//!
//! A [`ShiftRecord`] is one visit by a helper to a client, as produced by the
//! external ingestion step (spreadsheet scraper, CSV importer or manual
//! entry). Records are validated once when they are built and the engine only
//! ever reads them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calculation::parse_time_range;
use crate::error::{EngineError, EngineResult};

/// The kind of care delivered during a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    /// Physical care (bathing, toileting, feeding).
    BodyCare,
    /// Household support (cleaning, cooking, shopping).
    Housework,
    /// Escorting the client on outings and hospital visits.
    OutingEscort,
    /// Long-duration visiting care for clients with severe disabilities.
    SevereCare,
    /// Office work.
    Office,
    /// Sales work.
    Sales,
    /// Anything else.
    Other,
}

impl ServiceCategory {
    /// All categories in display order.
    pub const ALL: [ServiceCategory; 7] = [
        ServiceCategory::BodyCare,
        ServiceCategory::Housework,
        ServiceCategory::OutingEscort,
        ServiceCategory::SevereCare,
        ServiceCategory::Office,
        ServiceCategory::Sales,
        ServiceCategory::Other,
    ];

    /// Human-readable label used on payslips and care lists.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::BodyCare => "Body care",
            ServiceCategory::Housework => "Housework",
            ServiceCategory::OutingEscort => "Outing escort",
            ServiceCategory::SevereCare => "Severe care",
            ServiceCategory::Office => "Office",
            ServiceCategory::Sales => "Sales",
            ServiceCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            ServiceCategory::BodyCare => "body_care",
            ServiceCategory::Housework => "housework",
            ServiceCategory::OutingEscort => "outing_escort",
            ServiceCategory::SevereCare => "severe_care",
            ServiceCategory::Office => "office",
            ServiceCategory::Sales => "sales",
            ServiceCategory::Other => "other",
        };
        write!(f, "{}", key)
    }
}

/// One scheduled visit by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Unique identifier for the shift.
    pub id: String,
    /// The calendar date the shift starts on.
    pub date: NaiveDate,
    /// Start time of day.
    pub start_time: NaiveTime,
    /// End time of day; at or before `start_time` means the shift ends the next day.
    pub end_time: NaiveTime,
    /// The helper who worked the shift.
    pub worker_id: String,
    /// The client visited.
    #[serde(default)]
    pub client_name: String,
    /// The kind of care delivered.
    pub service_category: ServiceCategory,
    /// The worker accompanied another helper (training / escort visit).
    #[serde(default)]
    pub is_accompanying: bool,
    /// Office work, paid at the office rate.
    #[serde(default)]
    pub is_office: bool,
    /// Sales work, paid at the sales rate.
    #[serde(default)]
    pub is_sales: bool,
    /// The visit was cancelled; excluded from every total.
    #[serde(default)]
    pub is_cancelled: bool,
}

impl ShiftRecord {
    /// Creates an uncancelled, unflagged shift.
    ///
    /// # Example
    ///
    /// ```
    /// use homecare_payroll::models::{ServiceCategory, ShiftRecord};
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let shift = ShiftRecord::new(
    ///     "shift_001",
    ///     "helper_01",
    ///     NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
    ///     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    ///     ServiceCategory::BodyCare,
    /// )
    /// .with_client("Sato");
    ///
    /// assert_eq!(shift.client_name, "Sato");
    /// assert!(!shift.is_cancelled);
    /// ```
    pub fn new(
        id: impl Into<String>,
        worker_id: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        service_category: ServiceCategory,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            start_time,
            end_time,
            worker_id: worker_id.into(),
            client_name: String::new(),
            service_category,
            is_accompanying: false,
            is_office: false,
            is_sales: false,
            is_cancelled: false,
        }
    }

    /// Creates a shift from a spreadsheet-style `"HH:MM-HH:MM"` range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidShift`] when the range cannot be parsed.
    ///
    /// ```
    /// use homecare_payroll::models::{ServiceCategory, ShiftRecord};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
    /// let shift = ShiftRecord::from_time_range("s1", "w1", date, "23:00-01:00", ServiceCategory::SevereCare)?;
    /// assert_eq!(shift.end_time.to_string(), "01:00:00");
    ///
    /// assert!(ShiftRecord::from_time_range("s2", "w1", date, "9時-12時", ServiceCategory::Housework).is_err());
    /// # Ok::<(), homecare_payroll::error::EngineError>(())
    /// ```
    pub fn from_time_range(
        id: impl Into<String>,
        worker_id: impl Into<String>,
        date: NaiveDate,
        time_range: &str,
        service_category: ServiceCategory,
    ) -> EngineResult<Self> {
        let id = id.into();
        let (start, end) =
            parse_time_range(time_range).ok_or_else(|| EngineError::InvalidShift {
                shift_id: id.clone(),
                message: format!("unparseable time range '{}'", time_range),
            })?;
        Ok(Self::new(id, worker_id, date, start, end, service_category))
    }

    /// Sets the client name.
    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    /// Marks the shift as an accompanying visit.
    pub fn accompanying(mut self) -> Self {
        self.is_accompanying = true;
        self
    }

    /// Marks the shift as office work.
    pub fn office(mut self) -> Self {
        self.is_office = true;
        self
    }

    /// Marks the shift as sales work.
    pub fn sales(mut self) -> Self {
        self.is_sales = true;
        self
    }

    /// Marks the shift as cancelled.
    pub fn cancelled(mut self) -> Self {
        self.is_cancelled = true;
        self
    }

    /// Formats the shift's times as `"HH:MM-HH:MM"`.
    pub fn time_range_label(&self) -> String {
        format!(
            "{}-{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}
