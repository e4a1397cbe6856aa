//! Discount/growth sensitivity grid
//!
//! Each cell rebuilds the schedule from its own copy of the assumptions with
//! the resolved discount and growth rates shifted by whole steps.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::ScenarioOutcome;
use crate::assumptions::Assumptions;
use crate::schedule::{RateShift, ScheduleBuilder};

/// Grid shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Steps either side of the base rates (3 gives a 7×7 grid)
    pub steps: u32,
    /// Size of one step in rate units
    pub step_size: f64,
    /// Compute cells on the rayon thread pool
    pub parallel: bool,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            steps: 3,
            step_size: 0.01,
            parallel: true,
        }
    }
}

impl SensitivityConfig {
    /// Rate deltas in ascending order; the middle one is exactly zero
    pub fn deltas(&self) -> Vec<f64> {
        let steps = self.steps as i32;
        (-steps..=steps).map(|k| k as f64 * self.step_size).collect()
    }
}

/// One grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCell {
    pub discount_delta: f64,
    pub growth_delta: f64,
    pub outcome: ScenarioOutcome,
}

/// Grid of schedules; rows vary the discount rate, columns the growth rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    pub discount_deltas: Vec<f64>,
    pub growth_deltas: Vec<f64>,
    pub cells: Vec<Vec<SensitivityCell>>,
}

impl SensitivityGrid {
    pub fn cell(&self, discount_index: usize, growth_index: usize) -> Option<&SensitivityCell> {
        self.cells.get(discount_index)?.get(growth_index)
    }

    /// The unshifted cell
    pub fn centre(&self) -> Option<&SensitivityCell> {
        let mid = self.discount_deltas.len() / 2;
        self.cell(mid, self.growth_deltas.len() / 2)
    }

    /// Grand totals by cell; `None` for failed cells
    pub fn total_matrix(&self) -> Vec<Vec<Option<f64>>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.outcome.totals().map(|t| t.total)).collect())
            .collect()
    }

    pub fn failures(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.outcome.is_failed()).count()
    }
}

/// Build the sensitivity grid around `base`
pub fn run_sensitivity(base: &Assumptions, config: &SensitivityConfig) -> SensitivityGrid {
    let deltas = config.deltas();
    let n = deltas.len();
    let coordinates: Vec<(usize, usize)> = (0..n).flat_map(|i| (0..n).map(move |j| (i, j))).collect();

    let compute = |&(i, j): &(usize, usize)| {
        let shift = RateShift::new(deltas[i], deltas[j]);
        let builder = ScheduleBuilder::new(base.clone());
        let outcome = ScenarioOutcome::from_result(builder.build_with_shift(shift));
        debug!(
            "Sensitivity cell discount {:+.2}% growth {:+.2}%: {}",
            shift.discount * 100.0,
            shift.growth * 100.0,
            outcome.describe()
        );
        SensitivityCell {
            discount_delta: shift.discount,
            growth_delta: shift.growth,
            outcome,
        }
    };

    let flat: Vec<SensitivityCell> = if config.parallel {
        coordinates.par_iter().map(compute).collect()
    } else {
        coordinates.iter().map(compute).collect()
    };

    let mut cells_iter = flat.into_iter();
    let cells: Vec<Vec<SensitivityCell>> = (0..n).map(|_| cells_iter.by_ref().take(n).collect()).collect();

    let grid = SensitivityGrid {
        discount_deltas: deltas.clone(),
        growth_deltas: deltas,
        cells,
    };
    info!("Sensitivity grid {}x{} built, {} failed cells", n, n, grid.failures());
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::Mitigation;
    use crate::schedule::build_schedule;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn base() -> Assumptions {
        let mut a = Assumptions::new(d(2023, 6, 20), d(2025, 1, 15), 65_000.0);
        a.horizon.wle_years = Some(20.0);
        a.but_for.growth_rate = 0.03;
        a.discount.nominal_rate = 0.045;
        a.mitigation = Some(Mitigation {
            start_date: d(2024, 1, 1),
            base_annual: 22_000.0,
            growth_rate: None,
            fringe_pct: 0.0,
        });
        a
    }

    #[test]
    fn test_default_grid_is_seven_by_seven() {
        let grid = run_sensitivity(&base(), &SensitivityConfig::default());
        assert_eq!(grid.cells.len(), 7);
        assert!(grid.cells.iter().all(|row| row.len() == 7));
        assert_eq!(grid.discount_deltas[3], 0.0);
        assert_eq!(grid.failures(), 0);
    }

    #[test]
    fn test_centre_equals_base_schedule() {
        let a = base();
        let grid = run_sensitivity(&a, &SensitivityConfig::default());
        let centre = grid.centre().unwrap();
        assert_eq!(centre.discount_delta, 0.0);
        assert_eq!(centre.growth_delta, 0.0);
        assert_eq!(centre.outcome.schedule(), Some(&build_schedule(&a).unwrap()));
    }

    #[test]
    fn test_totals_move_with_rates() {
        let grid = run_sensitivity(&base(), &SensitivityConfig::default());
        let totals = grid.total_matrix();
        // Higher discount lowers the total; higher growth raises it
        assert!(totals[6][3].unwrap() < totals[3][3].unwrap());
        assert!(totals[3][6].unwrap() > totals[3][3].unwrap());
    }

    #[test]
    fn test_failing_cell_is_isolated() {
        let mut a = base();
        a.discount.nominal_rate = -0.975;
        let grid = run_sensitivity(&a, &SensitivityConfig::default());
        // 1 + (-0.975 - 0.03) <= 0 only in the lowest discount row
        for cell in &grid.cells[0] {
            assert!(cell.outcome.is_failed());
        }
        assert_eq!(grid.failures(), 7);
        assert!(grid.centre().unwrap().outcome.schedule().is_some());
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let a = base();
        let parallel = run_sensitivity(&a, &SensitivityConfig::default());
        let sequential = run_sensitivity(
            &a,
            &SensitivityConfig {
                parallel: false,
                ..Default::default()
            },
        );
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_input_error_fails_every_cell() {
        let mut a = base();
        a.dates.incident_date = d(2026, 1, 1);
        let grid = run_sensitivity(&a, &SensitivityConfig::default());
        assert_eq!(grid.failures(), 49);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_centre_matches_base(
            base_annual in 20_000.0f64..150_000.0,
            growth in -0.02f64..0.06,
            rate in 0.0f64..0.08,
            wle in 2.0f64..30.0,
        ) {
            let mut a = base();
            a.but_for.base_annual = base_annual;
            a.but_for.growth_rate = growth;
            a.discount.nominal_rate = rate;
            a.horizon.wle_years = Some(wle);

            let grid = run_sensitivity(&a, &SensitivityConfig { parallel: false, ..Default::default() });
            let centre = grid.centre().unwrap().outcome.totals().unwrap();
            prop_assert_eq!(centre, build_schedule(&a).unwrap().totals);
        }
    }
}
