//! Case assumptions: dates, horizons, earnings, adjustment factors,
//! mitigation, discounting and manual overrides

mod case;
mod contract;
mod discount;
mod earnings;
mod life_table;
pub mod loader;
pub mod validation;

pub use case::{AefParams, CaseType, FringeAefMode};
pub use contract::{CompositeFringe, ContractRate, ContractSchedule, Employment, FringeMethod};
pub use discount::{DiscountConfig, DiscountMethod};
pub use earnings::{ButForEarnings, LegalsConfig, ManualOverride, Mitigation, WageGrowthTable, WageStep};
pub use life_table::LifeTable;
pub use validation::{validate_inputs, validate_ranges, RangeViolation};

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::{DamagesError, Result};

/// Key dates of the case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDates {
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    /// Date the injury (or death) occurred; losses start here
    pub incident_date: NaiveDate,

    /// Date damages are valued at (trial or report date)
    pub valuation_date: NaiveDate,

    /// Fixed retirement date; derived from the horizon when absent
    #[serde(default)]
    pub retirement_date: Option<NaiveDate>,
}

/// Horizon lengths from work-life and life tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Horizon {
    /// Work-life expectancy in years (WLE)
    #[serde(default)]
    pub wle_years: Option<f64>,

    /// Years to final separation from the labor force (YFS)
    #[serde(default)]
    pub yfs_years: Option<f64>,

    /// Remaining life expectancy in years (LE); caps the loss horizon
    #[serde(default)]
    pub life_expectancy_years: Option<f64>,

    /// Custom retirement age, measured from the date of birth
    #[serde(default)]
    pub custom_retirement_age: Option<f64>,
}

impl Horizon {
    /// Years from valuation to the end of working life: YFS when the AEF is
    /// on, WLE otherwise
    pub fn work_life_years(&self, aef_enabled: bool) -> Option<f64> {
        if aef_enabled {
            self.yfs_years.or(self.wle_years)
        } else {
            self.wle_years.or(self.yfs_years)
        }
    }
}

/// Descriptive metadata carried into reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseMeta {
    #[serde(default)]
    pub case_name: Option<String>,

    #[serde(default)]
    pub wage_source_notes: Option<String>,

    #[serde(default)]
    pub benefit_source_notes: Option<String>,
}

/// Complete input record for one damages computation
///
/// Every scenario works on its own clone, so nothing here is shared between
/// grid cells or retirement variants (including `overrides`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    #[serde(default)]
    pub meta: CaseMeta,

    #[serde(default)]
    pub case_type: CaseType,

    pub dates: CaseDates,

    #[serde(default)]
    pub horizon: Horizon,

    pub but_for: ButForEarnings,

    #[serde(default)]
    pub fringe: FringeMethod,

    #[serde(default)]
    pub aef: AefParams,

    #[serde(default)]
    pub legals: LegalsConfig,

    #[serde(default)]
    pub mitigation: Option<Mitigation>,

    #[serde(default)]
    pub discount: DiscountConfig,

    #[serde(default)]
    pub life_table: Option<LifeTable>,

    /// Manual actual-earnings entries keyed by calendar year
    #[serde(default)]
    pub overrides: BTreeMap<i32, ManualOverride>,
}

impl Assumptions {
    /// Minimal assumptions: personal injury, no AEF, fringe, mitigation or discounting options set
    pub fn new(incident_date: NaiveDate, valuation_date: NaiveDate, base_annual: f64) -> Self {
        Self {
            meta: CaseMeta::default(),
            case_type: CaseType::PersonalInjury,
            dates: CaseDates {
                date_of_birth: None,
                incident_date,
                valuation_date,
                retirement_date: None,
            },
            horizon: Horizon::default(),
            but_for: ButForEarnings {
                base_annual,
                growth_rate: 0.0,
                wage_table: None,
            },
            fringe: FringeMethod::None,
            aef: AefParams::default(),
            legals: LegalsConfig::default(),
            mitigation: None,
            discount: DiscountConfig::default(),
            life_table: None,
            overrides: BTreeMap::new(),
        }
    }

    pub fn incident_year(&self) -> i32 {
        self.dates.incident_date.year()
    }

    pub fn valuation_year(&self) -> i32 {
        self.dates.valuation_date.year()
    }

    /// Age at `date`, if the date of birth is known; zero before birth
    pub fn age_at(&self, date: NaiveDate) -> Result<Option<f64>> {
        self.dates
            .date_of_birth
            .map(|dob| calendar::age(dob, date.max(dob)))
            .transpose()
    }

    /// Age at the valuation date; requires the date of birth
    pub fn current_age(&self) -> Result<f64> {
        let dob = self
            .dates
            .date_of_birth
            .ok_or(DamagesError::MissingField("dates.date_of_birth"))?;
        calendar::age(dob, self.dates.valuation_date)
    }

    /// Horizon years measured from valuation, when retirement is derived from
    /// WLE/YFS rather than a fixed date or custom age
    pub fn horizon_years(&self) -> Option<f64> {
        if self.dates.retirement_date.is_some() || self.horizon.custom_retirement_age.is_some() {
            return None;
        }
        self.horizon.work_life_years(self.aef.enabled)
    }

    /// Date the loss period ends
    ///
    /// Resolution order: fixed retirement date, date of birth + custom
    /// retirement age, valuation + YFS (AEF on) or WLE (AEF off). The result
    /// is capped at valuation + life expectancy when that is configured.
    pub fn retirement_date(&self) -> Result<NaiveDate> {
        let planned = if let Some(date) = self.dates.retirement_date {
            date
        } else if let Some(age) = self.horizon.custom_retirement_age {
            let dob = self
                .dates
                .date_of_birth
                .ok_or(DamagesError::MissingField("dates.date_of_birth"))?;
            calendar::add_years(dob, age)?
        } else {
            let years = self
                .horizon_years()
                .ok_or(DamagesError::MissingField("horizon.wle_years"))?;
            calendar::add_years(self.dates.valuation_date, years)?
        };

        match self.horizon.life_expectancy_years {
            Some(le) => {
                let death = calendar::add_years(self.dates.valuation_date, le)?;
                if death < planned {
                    warn!(
                        "Retirement date {} is beyond life expectancy; capping at {}",
                        planned, death
                    );
                    Ok(death)
                } else {
                    Ok(planned)
                }
            }
            None => Ok(planned),
        }
    }

    /// Copy of these assumptions with a fixed retirement date substituted
    pub fn with_retirement_date(&self, date: NaiveDate) -> Self {
        let mut copy = self.clone();
        copy.dates.retirement_date = Some(date);
        copy
    }

    /// Enter (or replace) a manual actual-earnings override for a year
    pub fn set_override(&mut self, year: i32, entry: ManualOverride) {
        self.overrides.insert(year, entry);
    }

    pub fn clear_override(&mut self, year: i32) -> Option<ManualOverride> {
        self.overrides.remove(&year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn base() -> Assumptions {
        let mut a = Assumptions::new(d(2023, 6, 20), d(2025, 1, 15), 65_000.0);
        a.dates.date_of_birth = Some(d(1980, 1, 15));
        a.horizon.wle_years = Some(20.0);
        a.horizon.yfs_years = Some(22.0);
        a
    }

    #[test]
    fn test_retirement_from_wle_when_aef_off() {
        assert_eq!(base().retirement_date().unwrap(), d(2045, 1, 15));
    }

    #[test]
    fn test_retirement_from_yfs_when_aef_on() {
        let mut a = base();
        a.aef.enabled = true;
        assert_eq!(a.retirement_date().unwrap(), d(2047, 1, 15));
    }

    #[test]
    fn test_custom_age_beats_horizon() {
        let mut a = base();
        a.horizon.custom_retirement_age = Some(62.0);
        assert_eq!(a.retirement_date().unwrap(), d(2042, 1, 15));
    }

    #[test]
    fn test_age_before_birth_is_zero() {
        let mut a = base();
        a.dates.date_of_birth = Some(d(2023, 9, 1));
        assert_eq!(a.age_at(d(2023, 7, 1)).unwrap(), Some(0.0));
        assert_eq!(a.age_at(d(2024, 9, 1)).unwrap(), Some(1.0));

        a.dates.date_of_birth = None;
        assert_eq!(a.age_at(d(2023, 7, 1)).unwrap(), None);
    }

    #[test]
    fn test_fixed_date_beats_everything() {
        let mut a = base();
        a.horizon.custom_retirement_age = Some(62.0);
        a.dates.retirement_date = Some(d(2030, 6, 30));
        assert_eq!(a.retirement_date().unwrap(), d(2030, 6, 30));
    }

    #[test]
    fn test_life_expectancy_caps_retirement() {
        let mut a = base();
        a.horizon.life_expectancy_years = Some(10.0);
        assert_eq!(a.retirement_date().unwrap(), d(2035, 1, 15));
    }

    #[test]
    fn test_missing_horizon_is_an_input_error() {
        let a = Assumptions::new(d(2023, 6, 20), d(2025, 1, 15), 65_000.0);
        assert!(matches!(a.retirement_date(), Err(DamagesError::MissingField(_))));
        assert!(matches!(a.current_age(), Err(DamagesError::MissingField(_))));
    }

    #[test]
    fn test_current_age() {
        assert_eq!(base().current_age().unwrap(), 45.0);
    }

    #[test]
    fn test_with_retirement_date_leaves_base_untouched() {
        let a = base();
        let b = a.with_retirement_date(d(2040, 1, 1));
        assert_eq!(a.dates.retirement_date, None);
        assert_eq!(b.dates.retirement_date, Some(d(2040, 1, 1)));
    }

    #[test]
    fn test_override_keys_round_trip_through_json() {
        let mut a = base();
        a.set_override(2024, ManualOverride { actual_earnings: 18_000.0, actual_fringe: 0.0 });
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.contains("\"2024\""));
        let back: Assumptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
