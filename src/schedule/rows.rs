//! Schedule output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::aef::AefFactors;
use super::rates::ResolvedRates;

/// Where a row sits relative to the valuation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPeriod {
    /// Entirely before valuation
    Past,
    /// Valuation falls inside the year
    Straddle,
    /// Entirely after valuation
    Future,
}

/// One calendar year of the damages schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: i32,
    /// Age at the mid-year date, when the date of birth is known
    pub age: Option<f64>,
    /// Fraction of the year inside the loss period
    pub portion: f64,
    pub period: RowPeriod,

    // But-for side
    pub bf_gross: f64,
    pub bf_adjusted: f64,
    pub bf_fringe: f64,
    pub bf_health_welfare: f64,
    pub bf_pension: f64,
    pub bf_legals: f64,

    // Actual side
    pub act_earnings: f64,
    pub act_fringe: f64,
    pub act_legals: f64,
    /// Actual figures come from a manual override
    pub overridden: bool,

    // Loss and time value
    pub loss: f64,
    pub past: f64,
    pub past_with_interest: f64,
    pub future: f64,
    pub pv_future: f64,
    pub survival_prob: f64,
    pub survival_weighted_future: f64,
}

impl YearRow {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            age: None,
            portion: 0.0,
            period: RowPeriod::Past,
            bf_gross: 0.0,
            bf_adjusted: 0.0,
            bf_fringe: 0.0,
            bf_health_welfare: 0.0,
            bf_pension: 0.0,
            bf_legals: 0.0,
            act_earnings: 0.0,
            act_fringe: 0.0,
            act_legals: 0.0,
            overridden: false,
            loss: 0.0,
            past: 0.0,
            past_with_interest: 0.0,
            future: 0.0,
            pv_future: 0.0,
            survival_prob: 1.0,
            survival_weighted_future: 0.0,
        }
    }

    /// But-for compensation after adjustment
    pub fn but_for_total(&self) -> f64 {
        self.bf_adjusted + self.bf_fringe + self.bf_legals
    }

    pub fn actual_total(&self) -> f64 {
        self.act_earnings + self.act_fringe + self.act_legals
    }
}

/// Aggregate figures of a schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    /// Past losses with prejudgment interest
    pub past: f64,
    /// Past losses before interest
    pub past_before_interest: f64,
    /// Future losses before discounting
    pub future_nominal: f64,
    /// Present value of future losses
    pub future_pv: f64,
    /// `past + future_pv`
    pub total: f64,
    /// Present value of future losses weighted by survival
    pub survival_weighted_future_pv: f64,
}

/// Complete schedule for one set of assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub incident_date: NaiveDate,
    pub valuation_date: NaiveDate,
    /// End of the loss period; absent for an empty schedule
    pub retirement_date: Option<NaiveDate>,
    pub rates: ResolvedRates,
    pub aef: AefFactors,
    pub rows: Vec<YearRow>,
    pub totals: ScheduleTotals,
}

impl ScheduleResult {
    pub fn new(incident_date: NaiveDate, valuation_date: NaiveDate, rates: ResolvedRates, aef: AefFactors) -> Self {
        Self {
            incident_date,
            valuation_date,
            retirement_date: None,
            rates,
            aef,
            rows: Vec::new(),
            totals: ScheduleTotals::default(),
        }
    }

    /// Schedule with no rows and zero totals
    pub fn empty(incident_date: NaiveDate, valuation_date: NaiveDate) -> Self {
        Self::new(incident_date, valuation_date, ResolvedRates::default(), AefFactors::identity())
    }

    pub fn add_row(&mut self, row: YearRow) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum the rows into totals
    pub fn finalize(&mut self) {
        let sum = |f: fn(&YearRow) -> f64| self.rows.iter().map(f).sum::<f64>();
        let past = sum(|r| r.past_with_interest);
        let future_pv = sum(|r| r.pv_future);

        self.totals = ScheduleTotals {
            past,
            past_before_interest: sum(|r| r.past),
            future_nominal: sum(|r| r.future),
            future_pv,
            total: past + future_pv,
            survival_weighted_future_pv: sum(|r| r.survival_weighted_future),
        };
    }

    /// Rows with a part before the valuation date
    pub fn pre_valuation_rows(&self) -> impl Iterator<Item = &YearRow> {
        self.rows.iter().filter(|r| r.period != RowPeriod::Future)
    }

    /// Rows with a part after the valuation date
    pub fn post_valuation_rows(&self) -> impl Iterator<Item = &YearRow> {
        self.rows.iter().filter(|r| r.period != RowPeriod::Past)
    }

    pub fn row(&self, year: i32) -> Option<&YearRow> {
        self.rows.iter().find(|r| r.year == year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(year: i32, period: RowPeriod, past: f64, future: f64) -> YearRow {
        let mut r = YearRow::new(year);
        r.period = period;
        r.past = past;
        r.past_with_interest = past * 1.1;
        r.future = future;
        r.pv_future = future * 0.9;
        r.survival_weighted_future = future * 0.8;
        r.loss = past + future;
        r
    }

    #[test]
    fn test_finalize_sums_rows() {
        let mut result = ScheduleResult::empty(d(2023, 6, 20), d(2025, 1, 15));
        result.add_row(row(2024, RowPeriod::Past, 100.0, 0.0));
        result.add_row(row(2025, RowPeriod::Straddle, 10.0, 90.0));
        result.add_row(row(2026, RowPeriod::Future, 0.0, 100.0));
        result.finalize();

        let t = result.totals;
        assert!((t.past - 121.0).abs() < 1e-9);
        assert!((t.future_pv - 171.0).abs() < 1e-9);
        assert!((t.total - 292.0).abs() < 1e-9);
        assert!((t.survival_weighted_future_pv - 152.0).abs() < 1e-9);
        assert!((t.past_before_interest - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_partitions_share_straddle_row() {
        let mut result = ScheduleResult::empty(d(2023, 6, 20), d(2025, 1, 15));
        result.add_row(row(2024, RowPeriod::Past, 100.0, 0.0));
        result.add_row(row(2025, RowPeriod::Straddle, 10.0, 90.0));
        result.add_row(row(2026, RowPeriod::Future, 0.0, 100.0));

        let pre: Vec<i32> = result.pre_valuation_rows().map(|r| r.year).collect();
        let post: Vec<i32> = result.post_valuation_rows().map(|r| r.year).collect();
        assert_eq!(pre, vec![2024, 2025]);
        assert_eq!(post, vec![2025, 2026]);
    }

    #[test]
    fn test_empty_schedule_has_zero_totals() {
        let mut result = ScheduleResult::empty(d(2023, 6, 20), d(2025, 1, 15));
        result.finalize();
        assert!(result.is_empty());
        assert_eq!(result.totals, ScheduleTotals::default());
    }
}
