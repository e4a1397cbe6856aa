//! Fringe benefit methods and collectively bargained contract rate tables

use std::fmt;

use serde::{Deserialize, Serialize};

/// How but-for fringe benefits are computed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FringeMethod {
    /// No fringe benefits
    #[default]
    None,
    /// Fringe as a flat share of gross earnings
    Percentage { pct: f64 },
    /// Health/welfare plus pension accrual from contract rates
    Composite(CompositeFringe),
}

/// Employment basis used to select contract rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Employment {
    #[default]
    FullTime,
    PartTime,
}

impl Employment {
    /// Standard paid hours per year
    pub fn default_hours(&self) -> f64 {
        match self {
            Employment::FullTime => 2080.0,
            Employment::PartTime => 1040.0,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "full_time" | "ft" => Some(Employment::FullTime),
            "part_time" | "pt" => Some(Employment::PartTime),
            _ => None,
        }
    }
}

impl fmt::Display for Employment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Employment::FullTime => write!(f, "full_time"),
            Employment::PartTime => write!(f, "part_time"),
        }
    }
}

/// Contribution rates for one classification over one contract period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRate {
    /// First calendar year the rates apply (inclusive)
    pub start_year: i32,
    /// Last calendar year the rates apply (inclusive)
    pub end_year: i32,
    pub classification: String,
    pub employment: Employment,
    /// Health and welfare contribution per paid hour
    pub hw_hourly: f64,
    /// Total weekly benefit contribution (health/welfare plus pension)
    pub weekly_total_increase: f64,
}

impl ContractRate {
    pub fn covers(&self, year: i32) -> bool {
        self.start_year <= year && year <= self.end_year
    }
}

/// Multi-year table of contract periods
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractSchedule {
    pub rates: Vec<ContractRate>,
}

impl ContractSchedule {
    pub fn new(rates: Vec<ContractRate>) -> Self {
        Self { rates }
    }

    /// Rates for a classification/employment in a calendar year
    ///
    /// A year no period covers takes the most recent period ended before it;
    /// years before the first period use the earliest rates.
    pub fn rates_for(&self, year: i32, classification: &str, employment: Employment) -> Option<&ContractRate> {
        let candidates: Vec<&ContractRate> = self
            .rates
            .iter()
            .filter(|r| r.employment == employment && r.classification.eq_ignore_ascii_case(classification))
            .collect();

        if let Some(rate) = candidates.iter().copied().find(|r| r.covers(year)) {
            return Some(rate);
        }

        candidates
            .iter()
            .copied()
            .filter(|r| r.end_year < year)
            .max_by_key(|r| r.end_year)
            .or_else(|| candidates.into_iter().min_by_key(|r| r.start_year))
    }
}

/// Composite fringe configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeFringe {
    pub classification: String,

    #[serde(default)]
    pub employment: Employment,

    /// Paid hours per year; defaults to the employment basis standard
    #[serde(default)]
    pub hours_per_year: Option<f64>,

    /// Annual growth of contributions, compounded for years after the incident year
    #[serde(default)]
    pub compound_rate: Option<f64>,

    #[serde(default)]
    pub schedule: ContractSchedule,
}

impl CompositeFringe {
    pub fn hours(&self) -> f64 {
        self.hours_per_year.unwrap_or_else(|| self.employment.default_hours())
    }
}
