//! Scenario runners: sensitivity grid and retirement scenarios
//!
//! Holds one set of base assumptions and runs many schedules against it.
//! Every run builds from its own clone of the base, so runs never share
//! state and the base is never modified.

mod retirement;
mod sensitivity;

pub use retirement::{run_retirement_scenarios, RetirementConfig, RetirementScenario, ScenarioKind};
pub use sensitivity::{run_sensitivity, SensitivityCell, SensitivityConfig, SensitivityGrid};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assumptions::{loader, Assumptions};
use crate::error::Result;
use crate::schedule::{RateShift, ScheduleBuilder, ScheduleResult, ScheduleTotals};

/// Result of one scenario run
///
/// A failed run carries the error text so the rest of a grid can complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Completed { schedule: ScheduleResult },
    Failed { error: String },
}

impl ScenarioOutcome {
    pub fn from_result(result: Result<ScheduleResult>) -> Self {
        match result {
            Ok(schedule) => ScenarioOutcome::Completed { schedule },
            Err(e) => ScenarioOutcome::Failed { error: e.to_string() },
        }
    }

    pub fn schedule(&self) -> Option<&ScheduleResult> {
        match self {
            ScenarioOutcome::Completed { schedule } => Some(schedule),
            ScenarioOutcome::Failed { .. } => None,
        }
    }

    pub fn totals(&self) -> Option<ScheduleTotals> {
        self.schedule().map(|s| s.totals)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ScenarioOutcome::Failed { .. })
    }

    /// One-line description for logs
    pub fn describe(&self) -> String {
        match self {
            ScenarioOutcome::Completed { schedule } => format!("total {:.2}", schedule.totals.total),
            ScenarioOutcome::Failed { error } => format!("failed: {}", error),
        }
    }
}

/// Runner holding read-only base assumptions
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_json("case.json")?;
/// let base = runner.run_base()?;
/// let grid = runner.run_sensitivity(&SensitivityConfig::default());
/// let retirement = runner.run_retirement(&RetirementConfig::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Create runner by loading a case file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            base_assumptions: loader::load_assumptions(path)?,
        })
    }

    /// Base schedule at the configured rates
    pub fn run_base(&self) -> Result<ScheduleResult> {
        ScheduleBuilder::new(self.base_assumptions.clone()).build()
    }

    /// Run one schedule per rate shift
    pub fn run_shifts(&self, shifts: &[RateShift]) -> Vec<ScenarioOutcome> {
        shifts
            .iter()
            .map(|&shift| {
                let builder = ScheduleBuilder::new(self.base_assumptions.clone());
                ScenarioOutcome::from_result(builder.build_with_shift(shift))
            })
            .collect()
    }

    pub fn run_sensitivity(&self, config: &SensitivityConfig) -> SensitivityGrid {
        run_sensitivity(&self.base_assumptions, config)
    }

    pub fn run_retirement(&self, config: &RetirementConfig) -> Result<Vec<RetirementScenario>> {
        run_retirement_scenarios(&self.base_assumptions, config)
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Mutable access for edits between runs (e.g. entering overrides)
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}
