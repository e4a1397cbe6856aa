//! Error types for damages computations and input loading

use chrono::NaiveDate;
use thiserror::Error;

/// Type alias for Result using the crate error type.
pub type Result<T> = std::result::Result<T, DamagesError>;

/// Errors raised while validating inputs or computing a schedule.
///
/// Numeric edge conditions (degenerate WLE/YFS ratio, zero horizon) are not
/// errors; the builder resolves them to an empty schedule.
#[derive(Error, Debug)]
pub enum DamagesError {
    #[error("Incident date {incident} is after valuation date {valuation}; past damages cannot be in the future")]
    IncidentAfterValuation {
        incident: NaiveDate,
        valuation: NaiveDate,
    },

    #[error("Retirement date {retirement} precedes incident date {incident}")]
    RetirementBeforeIncident {
        retirement: NaiveDate,
        incident: NaiveDate,
    },

    #[error("Interval start {start} is after end {end}")]
    InvertedInterval { start: NaiveDate, end: NaiveDate },

    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),

    #[error("Invalid {name} rate {value}: 1 + rate must be positive")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("No contract rates for classification '{classification}' ({employment}) in {year}")]
    MissingContractRates {
        classification: String,
        employment: String,
        year: i32,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DamagesError {
    /// True for errors caused by the supplied assumptions rather than I/O
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Csv(_) | Self::Json(_))
    }
}
