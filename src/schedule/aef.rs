//! Adjustment to Earnings Formula (AEF)
//!
//! `AEF = (WLE/YFS) × (1 − UR×(1−URF)) × (1 − TaxEffective) × (1 − PC) × (1 − PM)`
//! with `TaxEffective = 1 − (1 − federal)(1 − state)`.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, FringeAefMode};
use crate::error::{DamagesError, Result};

/// AEF components and resulting factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AefFactors {
    pub enabled: bool,
    /// WLE / YFS
    pub participation: f64,
    /// UR × (1 − URF)
    pub effective_unemployment: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    /// Federal + state (reference only; not used in the factor)
    pub combined_tax: f64,
    pub effective_tax: f64,
    pub personal_consumption: f64,
    pub personal_maintenance: f64,
    /// Factor applied to but-for wages
    pub wage_factor: f64,
    /// Factor applied to but-for fringe and legals
    pub fringe_factor: f64,
}

impl AefFactors {
    /// Factors when the AEF is switched off
    pub fn identity() -> Self {
        Self {
            enabled: false,
            participation: 1.0,
            effective_unemployment: 0.0,
            federal_tax: 0.0,
            state_tax: 0.0,
            combined_tax: 0.0,
            effective_tax: 0.0,
            personal_consumption: 0.0,
            personal_maintenance: 0.0,
            wage_factor: 1.0,
            fringe_factor: 1.0,
        }
    }

    /// Compute the factors for a case
    ///
    /// Returns `Ok(None)` when the work-life ratio is zero, negative or not a
    /// number; the schedule is then empty.
    pub fn compute(assumptions: &Assumptions) -> Result<Option<Self>> {
        let params = &assumptions.aef;
        if !params.enabled {
            return Ok(Some(Self::identity()));
        }

        let wle = assumptions
            .horizon
            .wle_years
            .ok_or(DamagesError::MissingField("horizon.wle_years"))?;
        let yfs = assumptions
            .horizon
            .yfs_years
            .ok_or(DamagesError::MissingField("horizon.yfs_years"))?;

        let participation = wle / yfs;
        if !participation.is_finite() || participation <= 0.0 {
            warn!("Degenerate work-life ratio WLE/YFS = {}/{}; no losses computed", wle, yfs);
            return Ok(None);
        }

        let (pc, pm) = assumptions.case_type.consumption_terms();
        let effective_unemployment = params.effective_unemployment();
        let effective_tax = params.effective_tax();

        let wage_factor = participation
            * (1.0 - effective_unemployment)
            * (1.0 - effective_tax)
            * (1.0 - pc)
            * (1.0 - pm);

        let fringe_factor = match params.fringe_mode {
            FringeAefMode::None => 1.0,
            FringeAefMode::Partial => participation * (1.0 - effective_unemployment),
            FringeAefMode::Full => wage_factor,
        };

        Ok(Some(Self {
            enabled: true,
            participation,
            effective_unemployment,
            federal_tax: params.federal_tax,
            state_tax: params.state_tax,
            combined_tax: params.federal_tax + params.state_tax,
            effective_tax,
            personal_consumption: pc,
            personal_maintenance: pm,
            wage_factor,
            fringe_factor,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::CaseType;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn assumptions() -> Assumptions {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let mut a = Assumptions::new(d(2023, 6, 20), d(2025, 1, 15), 65_000.0);
        a.horizon.wle_years = Some(18.0);
        a.horizon.yfs_years = Some(20.0);
        a.aef.enabled = true;
        a.aef.unemployment_rate = 0.05;
        a.aef.unemployment_replacement = 0.4;
        a.aef.federal_tax = 0.12;
        a.aef.state_tax = 0.05;
        a
    }

    #[test]
    fn test_disabled_is_identity() {
        let mut a = assumptions();
        a.aef.enabled = false;
        let f = AefFactors::compute(&a).unwrap().unwrap();
        assert_eq!(f.wage_factor, 1.0);
        assert_eq!(f.fringe_factor, 1.0);
    }

    #[test]
    fn test_personal_injury_factor() {
        let f = AefFactors::compute(&assumptions()).unwrap().unwrap();
        let expected = 0.9 * (1.0 - 0.05 * 0.6) * (0.88 * 0.95);
        assert_abs_diff_eq!(f.wage_factor, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(f.combined_tax, 0.17, epsilon = 1e-12);
        assert_abs_diff_eq!(f.effective_tax, 1.0 - 0.88 * 0.95, epsilon = 1e-12);
        assert_eq!(f.fringe_factor, 1.0);
    }

    #[test]
    fn test_wrongful_death_applies_consumption() {
        let mut a = assumptions();
        let pi = AefFactors::compute(&a).unwrap().unwrap().wage_factor;
        a.case_type = CaseType::WrongfulDeath {
            personal_consumption: 0.25,
            personal_maintenance: 0.1,
        };
        let wd = AefFactors::compute(&a).unwrap().unwrap().wage_factor;
        assert_abs_diff_eq!(wd, pi * 0.75 * 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_fringe_modes() {
        let mut a = assumptions();
        a.aef.fringe_mode = FringeAefMode::Partial;
        let f = AefFactors::compute(&a).unwrap().unwrap();
        assert_abs_diff_eq!(f.fringe_factor, 0.9 * 0.97, epsilon = 1e-12);

        a.aef.fringe_mode = FringeAefMode::Full;
        let f = AefFactors::compute(&a).unwrap().unwrap();
        assert_eq!(f.fringe_factor, f.wage_factor);
    }

    #[test]
    fn test_degenerate_ratio_yields_none() {
        let mut a = assumptions();
        a.horizon.yfs_years = Some(0.0);
        assert!(AefFactors::compute(&a).unwrap().is_none());

        a.horizon.yfs_years = Some(20.0);
        a.horizon.wle_years = Some(0.0);
        assert!(AefFactors::compute(&a).unwrap().is_none());
    }

    #[test]
    fn test_missing_yfs_is_an_error() {
        let mut a = assumptions();
        a.horizon.yfs_years = None;
        assert!(matches!(AefFactors::compute(&a), Err(DamagesError::MissingField(_))));
    }
}
