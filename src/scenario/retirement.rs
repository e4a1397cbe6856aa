//! Alternate retirement-age scenarios

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::ScenarioOutcome;
use crate::assumptions::Assumptions;
use crate::calendar;
use crate::error::Result;
use crate::schedule::ScheduleBuilder;

/// Retirement ages to evaluate besides the work-life and custom ages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementConfig {
    pub fixed_ages: Vec<f64>,
}

impl Default for RetirementConfig {
    fn default() -> Self {
        Self {
            fixed_ages: vec![65.0, 67.0, 70.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Valuation + WLE (or YFS with the AEF on)
    WorkLife,
    /// Configured custom retirement age
    CustomAge,
    /// One of the fixed ages
    FixedAge,
}

/// Schedule under one substituted retirement date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementScenario {
    pub label: String,
    pub kind: ScenarioKind,
    /// Age at retirement, when the date of birth is known
    pub retirement_age: Option<f64>,
    pub retirement_date: NaiveDate,
    pub outcome: ScenarioOutcome,
}

struct Candidate {
    label: String,
    kind: ScenarioKind,
    age: Option<f64>,
    date: NaiveDate,
}

/// Run the retirement scenarios for `base`
///
/// Order is work-life, custom age, then fixed ages ascending. Ages at or
/// below the current age and dates not after valuation are left out.
pub fn run_retirement_scenarios(base: &Assumptions, config: &RetirementConfig) -> Result<Vec<RetirementScenario>> {
    let scenarios: Vec<RetirementScenario> = candidates(base, config)?
        .into_iter()
        .map(|c| {
            let builder = ScheduleBuilder::new(base.with_retirement_date(c.date));
            RetirementScenario {
                label: c.label,
                kind: c.kind,
                retirement_age: c.age,
                retirement_date: c.date,
                outcome: ScenarioOutcome::from_result(builder.build()),
            }
        })
        .collect();

    info!("{} retirement scenarios built", scenarios.len());
    Ok(scenarios)
}

fn candidates(base: &Assumptions, config: &RetirementConfig) -> Result<Vec<Candidate>> {
    let valuation = base.dates.valuation_date;
    let current_age = match base.dates.date_of_birth {
        Some(_) => Some(base.current_age()?),
        None => None,
    };

    let mut out = Vec::new();

    if let Some(years) = base.horizon.work_life_years(base.aef.enabled) {
        out.push(Candidate {
            label: format!("Work-life ({:.2} years)", years),
            kind: ScenarioKind::WorkLife,
            age: current_age.map(|age| age + years),
            date: calendar::add_years(valuation, years)?,
        });
    }

    let mut ages: Vec<(ScenarioKind, f64)> = Vec::new();
    if let Some(custom) = base.horizon.custom_retirement_age {
        ages.push((ScenarioKind::CustomAge, custom));
    }
    let mut fixed: Vec<f64> = config.fixed_ages.iter().copied().filter(|a| a.is_finite()).collect();
    fixed.sort_by(f64::total_cmp);
    fixed.dedup();
    ages.extend(fixed.into_iter().map(|age| (ScenarioKind::FixedAge, age)));

    match current_age {
        Some(current) => {
            for (kind, age) in ages {
                if age <= current {
                    continue;
                }
                let label = match kind {
                    ScenarioKind::CustomAge => format!("Custom age {}", age),
                    _ => format!("Age {}", age),
                };
                out.push(Candidate {
                    label,
                    kind,
                    age: Some(age),
                    date: calendar::add_years(valuation, age - current)?,
                });
            }
        }
        None if !ages.is_empty() => {
            warn!("No date of birth; age-based retirement scenarios skipped");
        }
        None => {}
    }

    out.retain(|c| c.date > valuation);
    Ok(out)
}
