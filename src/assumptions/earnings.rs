//! But-for earnings, wage growth tables, mitigation and manual overrides

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// But-for (uninjured) earnings configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButForEarnings {
    /// Annual gross earnings in the incident year
    pub base_annual: f64,

    /// Scalar annual growth rate
    #[serde(default)]
    pub growth_rate: f64,

    /// Optional year-specific wage steps replacing the scalar rate
    #[serde(default)]
    pub wage_table: Option<WageGrowthTable>,
}

/// One year's wage increment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WageStep {
    /// Proportional increase of the earnings level
    Rate(f64),
    /// Dollar increase of the annual earnings level
    Amount(f64),
}

impl WageStep {
    /// Apply this step to an annual earnings level
    pub fn apply(&self, level: f64) -> f64 {
        match *self {
            WageStep::Rate(r) => level * (1.0 + r),
            WageStep::Amount(a) => level + a,
        }
    }
}

/// Jurisdiction- or contract-specific wage growth by calendar year
///
/// The step for year Y moves the earnings level from Y−1 to Y. Steps
/// compound cumulatively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WageGrowthTable {
    pub steps: BTreeMap<i32, WageStep>,

    /// Where the table came from (contract, statute, survey)
    #[serde(default)]
    pub source: Option<String>,
}

impl WageGrowthTable {
    pub fn new(steps: BTreeMap<i32, WageStep>) -> Self {
        Self { steps, source: None }
    }

    pub fn step(&self, year: i32) -> Option<WageStep> {
        self.steps.get(&year).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Automatic post-injury (mitigation / offset) earnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mitigation {
    /// Earnings count for years whose mid-year date is on or after this date
    pub start_date: NaiveDate,

    /// Annual actual earnings in the start year
    pub base_annual: f64,

    /// Growth of actual earnings; defaults to the resolved but-for growth
    #[serde(default)]
    pub growth_rate: Option<f64>,

    /// Actual fringe as a share of actual earnings
    #[serde(default)]
    pub fringe_pct: f64,
}

/// Manually entered actual earnings for one calendar year
///
/// Replaces the automatic mitigation figures for that year unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualOverride {
    #[serde(alias = "actE")]
    pub actual_earnings: f64,

    #[serde(default, alias = "actFringe")]
    pub actual_fringe: f64,
}

/// Legally required (statutory employer) benefits
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LegalsConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Contribution rate applied to earnings
    #[serde(default)]
    pub rate: f64,
}

impl LegalsConfig {
    /// Legals on an earnings amount; zero when disabled
    pub fn on(&self, earnings: f64) -> f64 {
        if self.enabled {
            earnings * self.rate
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wage_steps_apply() {
        assert_abs_diff_eq!(WageStep::Rate(0.03).apply(100_000.0), 103_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(WageStep::Amount(2_080.0).apply(100_000.0), 102_080.0, epsilon = 1e-9);
    }

    #[test]
    fn test_override_accepts_short_field_names() {
        let json = r#"{"actE": 12000.0, "actFringe": 900.0}"#;
        let o: ManualOverride = serde_json::from_str(json).unwrap();
        assert_eq!(o.actual_earnings, 12_000.0);
        assert_eq!(o.actual_fringe, 900.0);

        let bare: ManualOverride = serde_json::from_str(r#"{"actual_earnings": 5.0}"#).unwrap();
        assert_eq!(bare.actual_fringe, 0.0);
    }

    #[test]
    fn test_wage_table_json() {
        let json = r#"{"steps": {"2024": {"kind": "rate", "value": 0.04}, "2025": {"kind": "amount", "value": 1500.0}}}"#;
        let table: WageGrowthTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.step(2024), Some(WageStep::Rate(0.04)));
        assert_eq!(table.step(2025), Some(WageStep::Amount(1500.0)));
        assert_eq!(table.step(2026), None);
    }

    #[test]
    fn test_legals_disabled_is_zero() {
        let legals = LegalsConfig { enabled: false, rate: 0.0765 };
        assert_eq!(legals.on(50_000.0), 0.0);
        let legals = LegalsConfig { enabled: true, rate: 0.0765 };
        assert_abs_diff_eq!(legals.on(50_000.0), 3_825.0, epsilon = 1e-9);
    }
}
