//! But-for fringe benefits

use serde::{Deserialize, Serialize};

use crate::assumptions::{CompositeFringe, FringeMethod};
use crate::error::{DamagesError, Result};

/// Standard weekly hours used to separate health/welfare from pension
const WEEKLY_HOURS: f64 = 40.0;
const WEEKS_PER_YEAR: f64 = 52.0;

/// Fringe for one year, before any AEF fringe factor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FringeAmounts {
    pub total: f64,
    pub health_welfare: f64,
    pub pension: f64,
}

impl FringeAmounts {
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            total: self.total * factor,
            health_welfare: self.health_welfare * factor,
            pension: self.pension * factor,
        }
    }
}

/// But-for fringe for `year`
///
/// `gross` is the prorated but-for gross; `portion` the year portion.
pub fn but_for_fringe(
    method: &FringeMethod,
    gross: f64,
    year: i32,
    incident_year: i32,
    portion: f64,
) -> Result<FringeAmounts> {
    match method {
        FringeMethod::None => Ok(FringeAmounts::default()),
        FringeMethod::Percentage { pct } => Ok(FringeAmounts {
            total: gross * pct,
            ..Default::default()
        }),
        FringeMethod::Composite(composite) => composite_fringe(composite, year, incident_year, portion),
    }
}

fn composite_fringe(c: &CompositeFringe, year: i32, incident_year: i32, portion: f64) -> Result<FringeAmounts> {
    let rate = c
        .schedule
        .rates_for(year, &c.classification, c.employment)
        .ok_or_else(|| DamagesError::MissingContractRates {
            classification: c.classification.clone(),
            employment: c.employment.to_string(),
            year,
        })?;

    let growth = match c.compound_rate {
        Some(r) if year > incident_year => (1.0 + r).powi(year - incident_year),
        _ => 1.0,
    };

    let health_welfare = rate.hw_hourly * c.hours() * portion * growth;
    // Pension is whatever the weekly package carries beyond health/welfare
    let pension = (rate.weekly_total_increase - rate.hw_hourly * WEEKLY_HOURS).max(0.0)
        * WEEKS_PER_YEAR
        * portion
        * growth;

    Ok(FringeAmounts {
        total: health_welfare + pension,
        health_welfare,
        pension,
    })
}
