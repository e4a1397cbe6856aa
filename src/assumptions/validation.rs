//! Input validation
//!
//! Hard checks (`validate_inputs`) reject assumptions a schedule cannot be
//! built from. Soft checks (`validate_ranges`) flag values outside the ranges
//! usually seen in forensic practice; those are reported, never enforced.

use log::warn;
use serde::Serialize;

use super::{Assumptions, DiscountMethod, FringeMethod};
use crate::error::{DamagesError, Result};

/// Reject assumptions that cannot produce a schedule
pub fn validate_inputs(a: &Assumptions) -> Result<()> {
    let dates = &a.dates;
    if dates.incident_date > dates.valuation_date {
        return Err(DamagesError::IncidentAfterValuation {
            incident: dates.incident_date,
            valuation: dates.valuation_date,
        });
    }

    if let Some(dob) = dates.date_of_birth {
        if dob > dates.incident_date {
            return Err(DamagesError::InvalidInput(format!(
                "date of birth {} is after incident date {}",
                dob, dates.incident_date
            )));
        }
    }

    if !a.but_for.base_annual.is_finite() || a.but_for.base_annual < 0.0 {
        return Err(DamagesError::InvalidInput(format!(
            "but-for base earnings must be a non-negative amount, got {}",
            a.but_for.base_annual
        )));
    }

    for (label, value) in [
        ("wle_years", a.horizon.wle_years),
        ("yfs_years", a.horizon.yfs_years),
        ("life_expectancy_years", a.horizon.life_expectancy_years),
        ("custom_retirement_age", a.horizon.custom_retirement_age),
    ] {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(DamagesError::InvalidInput(format!("{} is not a number", label)));
            }
        }
    }

    if let Some(m) = &a.mitigation {
        if !m.base_annual.is_finite() || m.base_annual < 0.0 {
            return Err(DamagesError::InvalidInput(format!(
                "mitigation base earnings must be a non-negative amount, got {}",
                m.base_annual
            )));
        }
    }

    for (year, entry) in &a.overrides {
        if !entry.actual_earnings.is_finite() || !entry.actual_fringe.is_finite() {
            return Err(DamagesError::InvalidInput(format!("override for {} is not a number", year)));
        }
    }

    let retirement = a.retirement_date()?;
    if retirement < dates.incident_date {
        return Err(DamagesError::RetirementBeforeIncident {
            retirement,
            incident: dates.incident_date,
        });
    }

    Ok(())
}

/// A configured value outside its customary range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeViolation {
    pub label: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub description: String,
}

struct RangeRule {
    label: &'static str,
    min: f64,
    max: f64,
}

const GROWTH: RangeRule = RangeRule { label: "growth_rate", min: -0.05, max: 0.15 };
const DISCOUNT: RangeRule = RangeRule { label: "discount_rate", min: -0.05, max: 0.20 };
const NDR: RangeRule = RangeRule { label: "net_discount_rate", min: -0.05, max: 0.20 };
const UNEMPLOYMENT: RangeRule = RangeRule { label: "effective_unemployment", min: 0.0, max: 0.35 };
const TAX: RangeRule = RangeRule { label: "effective_tax", min: 0.0, max: 0.65 };
const FRINGE_PCT: RangeRule = RangeRule { label: "fringe_pct", min: 0.0, max: 0.75 };

impl RangeRule {
    fn check(&self, value: f64, out: &mut Vec<RangeViolation>) {
        if value < self.min || value > self.max || !value.is_finite() {
            let description = format!(
                "{} of {:.2}% is outside the customary range {:.2}% to {:.2}%",
                self.label,
                value * 100.0,
                self.min * 100.0,
                self.max * 100.0
            );
            warn!("{}", description);
            out.push(RangeViolation {
                label: self.label,
                value,
                min: self.min,
                max: self.max,
                description,
            });
        }
    }
}

/// Flag configured rates outside customary ranges
pub fn validate_ranges(a: &Assumptions) -> Vec<RangeViolation> {
    let mut out = Vec::new();

    GROWTH.check(a.but_for.growth_rate, &mut out);
    if let Some(m) = &a.mitigation {
        if let Some(g) = m.growth_rate {
            GROWTH.check(g, &mut out);
        }
    }

    if a.discount.enabled {
        match a.discount.method {
            DiscountMethod::Nominal | DiscountMethod::Real => DISCOUNT.check(a.discount.method_rate(), &mut out),
            DiscountMethod::Ndr => NDR.check(a.discount.ndr, &mut out),
        }
    }

    if a.aef.enabled {
        UNEMPLOYMENT.check(a.aef.effective_unemployment(), &mut out);
        TAX.check(a.aef.effective_tax(), &mut out);
    }

    if let FringeMethod::Percentage { pct } = a.fringe {
        FRINGE_PCT.check(pct, &mut out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn base() -> Assumptions {
        let mut a = Assumptions::new(d(2023, 6, 20), d(2025, 1, 15), 65_000.0);
        a.horizon.wle_years = Some(20.0);
        a
    }

    #[test]
    fn test_valid_inputs_pass() {
        assert!(validate_inputs(&base()).is_ok());
    }

    #[test]
    fn test_incident_after_valuation_rejected() {
        let mut a = base();
        a.dates.incident_date = d(2025, 3, 1);
        assert!(matches!(
            validate_inputs(&a),
            Err(DamagesError::IncidentAfterValuation { .. })
        ));
    }

    #[test]
    fn test_retirement_before_incident_rejected() {
        let mut a = base();
        a.dates.retirement_date = Some(d(2022, 12, 31));
        assert!(matches!(
            validate_inputs(&a),
            Err(DamagesError::RetirementBeforeIncident { .. })
        ));
    }

    #[test]
    fn test_retirement_between_incident_and_valuation_is_valid() {
        let mut a = base();
        a.dates.retirement_date = Some(d(2024, 6, 30));
        assert!(validate_inputs(&a).is_ok());
    }

    #[test]
    fn test_missing_horizon_rejected() {
        let mut a = base();
        a.horizon.wle_years = None;
        assert!(matches!(validate_inputs(&a), Err(DamagesError::MissingField(_))));
    }

    #[test]
    fn test_negative_earnings_rejected() {
        let mut a = base();
        a.but_for.base_annual = -1.0;
        assert!(matches!(validate_inputs(&a), Err(DamagesError::InvalidInput(_))));
    }

    #[test]
    fn test_range_violations_are_reported() {
        let mut a = base();
        a.but_for.growth_rate = 0.25;
        a.fringe = FringeMethod::Percentage { pct: 0.9 };
        a.aef.enabled = true;
        a.aef.federal_tax = 0.5;
        a.aef.state_tax = 0.4;

        let labels: Vec<_> = validate_ranges(&a).into_iter().map(|v| v.label).collect();
        assert_eq!(labels, vec!["growth_rate", "effective_tax", "fringe_pct"]);
    }

    #[test]
    fn test_disabled_sections_are_not_checked() {
        let mut a = base();
        a.discount.enabled = false;
        a.discount.nominal_rate = 0.5;
        a.aef.unemployment_rate = 0.9;
        assert!(validate_ranges(&a).is_empty());
    }
}
