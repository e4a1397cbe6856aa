//! Rate resolution: effective growth, discount and prejudgment interest rates
//! for the selected discount method

use log::warn;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, DiscountMethod, WageGrowthTable};
use crate::error::{DamagesError, Result};

/// Perturbation of the resolved rates, in absolute rate units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateShift {
    pub discount: f64,
    pub growth: f64,
}

impl RateShift {
    pub const NONE: RateShift = RateShift {
        discount: 0.0,
        growth: 0.0,
    };

    pub fn new(discount: f64, growth: f64) -> Self {
        Self { discount, growth }
    }
}

/// Rates in effect for one schedule computation
///
/// | method  | growth     | discount     | interest        |
/// |---------|------------|--------------|-----------------|
/// | nominal | configured | nominal rate | nominal rate    |
/// | real    | 0          | real rate    | real + growth   |
/// | ndr     | 0          | NDR          | NDR + growth    |
///
/// An explicit interest rate replaces the derived one. Shifts are added after
/// resolution: the discount shift moves both discount and interest rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRates {
    pub method: DiscountMethod,
    pub growth_rate: f64,
    pub discount_rate: f64,
    pub interest_rate: f64,
    pub discounting: bool,
    pub prejudgment_interest: bool,
    pub shift: RateShift,

    /// Wage steps, only under the nominal method
    #[serde(skip)]
    wage_table: Option<WageGrowthTable>,
}

impl ResolvedRates {
    pub fn resolve(assumptions: &Assumptions, shift: RateShift) -> Result<Self> {
        let d = &assumptions.discount;
        let configured_growth = assumptions.but_for.growth_rate;

        let (growth, discount, interest) = match d.method {
            DiscountMethod::Nominal => (configured_growth, d.nominal_rate, d.nominal_rate),
            DiscountMethod::Real => (0.0, d.real_rate, d.real_rate + configured_growth),
            DiscountMethod::Ndr => (0.0, d.ndr, d.ndr + configured_growth),
        };
        let interest = d.interest_rate.unwrap_or(interest);

        let wage_table = match (&assumptions.but_for.wage_table, d.method) {
            (Some(table), DiscountMethod::Nominal) if !table.is_empty() => Some(table.clone()),
            (Some(table), method) if !table.is_empty() => {
                warn!(
                    "Wage growth table ignored under the {} method; earnings are held level",
                    method.as_str()
                );
                None
            }
            _ => None,
        };

        let rates = Self {
            method: d.method,
            growth_rate: growth + shift.growth,
            discount_rate: discount + shift.discount,
            interest_rate: interest + shift.discount,
            discounting: d.enabled,
            prejudgment_interest: d.prejudgment_interest,
            shift,
            wage_table,
        };
        rates.check()?;
        Ok(rates)
    }

    fn check(&self) -> Result<()> {
        for (name, value, used) in [
            ("growth", self.growth_rate, true),
            ("discount", self.discount_rate, self.discounting),
            ("interest", self.interest_rate, self.prejudgment_interest),
        ] {
            if used && (!value.is_finite() || 1.0 + value <= 0.0) {
                return Err(DamagesError::InvalidRate { name, value });
            }
        }
        Ok(())
    }

    pub fn uses_wage_table(&self) -> bool {
        self.wage_table.is_some()
    }

    /// Annual earnings level in `year`, grown from `base` in `from_year`
    ///
    /// Wage steps compound year by year (with the growth shift on top);
    /// years missing from the table grow at the scalar rate.
    pub fn grow(&self, base: f64, from_year: i32, year: i32) -> f64 {
        if year <= from_year {
            return base;
        }
        match &self.wage_table {
            None => base * (1.0 + self.growth_rate).powi(year - from_year),
            Some(table) => (from_year + 1..=year).fold(base, |level, y| match table.step(y) {
                Some(step) => step.apply(level) * (1.0 + self.shift.growth),
                None => level * (1.0 + self.growth_rate),
            }),
        }
    }

    /// Growth of automatic mitigation earnings
    pub fn mitigation_growth(&self, own_rate: Option<f64>) -> f64 {
        match own_rate {
            Some(rate) => rate + self.shift.growth,
            None => self.growth_rate,
        }
    }

    /// Present-value factor for an amount `years` after valuation
    pub fn discount_factor(&self, years: f64) -> f64 {
        if self.discounting {
            (1.0 + self.discount_rate).powf(-years)
        } else {
            1.0
        }
    }

    /// Simple-interest accumulation factor for an amount `years` before valuation
    pub fn interest_factor(&self, years: f64) -> f64 {
        if self.prejudgment_interest {
            1.0 + self.interest_rate * years
        } else {
            1.0
        }
    }
}
