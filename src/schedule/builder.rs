//! Year-by-year damages schedule builder

use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};

use super::aef::AefFactors;
use super::fringe::but_for_fringe;
use super::rates::{RateShift, ResolvedRates};
use super::rows::{RowPeriod, ScheduleResult, YearRow};
use crate::assumptions::{validate_inputs, Assumptions};
use crate::calendar::{self, year_fraction};
use crate::error::{DamagesError, Result};

/// Calendar span of one row, split at the valuation date
#[derive(Debug, Clone, Copy)]
struct YearSpan {
    start: NaiveDate,
    end: NaiveDate,
    /// End of the pre-valuation part (== start when there is none)
    past_end: NaiveDate,
    /// Start of the post-valuation part (== end when there is none)
    future_start: NaiveDate,
    portion: f64,
    past_years: f64,
    future_years: f64,
}

impl YearSpan {
    fn period(&self) -> RowPeriod {
        if self.future_years <= 0.0 {
            RowPeriod::Past
        } else if self.past_years <= 0.0 {
            RowPeriod::Future
        } else {
            RowPeriod::Straddle
        }
    }
}

/// Builds the damages schedule for one set of assumptions
pub struct ScheduleBuilder {
    assumptions: Assumptions,
}

impl ScheduleBuilder {
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Build the schedule at the configured rates
    pub fn build(&self) -> Result<ScheduleResult> {
        self.build_with_shift(RateShift::NONE)
    }

    /// Build the schedule with resolved rates shifted by `shift`
    pub fn build_with_shift(&self, shift: RateShift) -> Result<ScheduleResult> {
        let a = &self.assumptions;
        let incident = a.dates.incident_date;
        let valuation = a.dates.valuation_date;

        if incident > valuation {
            return Err(DamagesError::IncidentAfterValuation { incident, valuation });
        }

        if let Some(years) = a.horizon_years() {
            if years <= 0.0 {
                warn!("Loss horizon of {} years; no losses computed", years);
                return Ok(self.empty());
            }
        }

        validate_inputs(a)?;
        let rates = ResolvedRates::resolve(a, shift)?;
        let Some(aef) = AefFactors::compute(a)? else {
            return Ok(self.empty());
        };
        let retirement = a.retirement_date()?;

        let mut result = ScheduleResult::new(incident, valuation, rates, aef);
        result.retirement_date = Some(retirement);

        let valuation_age = match (&a.life_table, a.dates.date_of_birth) {
            (Some(_), Some(dob)) => Some(calendar::age(dob, valuation)?),
            _ => None,
        };

        for year in incident.year()..=retirement.year() {
            let Some(span) = self.year_span(year, retirement)? else {
                continue;
            };
            let row = self.calculate_year(year, &span, &result.rates, &result.aef, valuation_age)?;
            debug!(
                "{} portion={:.4} gross={:.2} loss={:.2} past={:.2} pv_future={:.2}",
                row.year, row.portion, row.bf_gross, row.loss, row.past_with_interest, row.pv_future
            );
            result.add_row(row);
        }

        result.finalize();
        info!(
            "Schedule {}..{}: {} rows, past {:.2}, future PV {:.2}, total {:.2}",
            incident,
            retirement,
            result.rows.len(),
            result.totals.past,
            result.totals.future_pv,
            result.totals.total
        );
        Ok(result)
    }

    fn empty(&self) -> ScheduleResult {
        let mut result = ScheduleResult::empty(self.assumptions.dates.incident_date, self.assumptions.dates.valuation_date);
        result.finalize();
        result
    }

    /// Part of `year` inside the loss period [incident, retirement)
    fn year_span(&self, year: i32, retirement: NaiveDate) -> Result<Option<YearSpan>> {
        let valuation = self.assumptions.dates.valuation_date;
        let start = calendar::year_start(year)?.max(self.assumptions.dates.incident_date);
        let end = calendar::year_start(year + 1)?.min(retirement);
        if end <= start {
            return Ok(None);
        }

        let past_end = valuation.clamp(start, end);
        let future_start = past_end;
        let portion = year_fraction(start, end);

        Ok(Some(YearSpan {
            start,
            end,
            past_end,
            future_start,
            portion,
            past_years: year_fraction(start, past_end),
            future_years: year_fraction(future_start, end),
        }))
    }

    fn calculate_year(
        &self,
        year: i32,
        span: &YearSpan,
        rates: &ResolvedRates,
        aef: &AefFactors,
        valuation_age: Option<f64>,
    ) -> Result<YearRow> {
        let a = &self.assumptions;
        let incident_year = a.incident_year();
        let mid_year = calendar::mid_year_date(year)?;

        let mut row = YearRow::new(year);
        row.age = a.age_at(mid_year)?;
        row.portion = span.portion;
        row.period = span.period();

        // But-for earnings
        let level = rates.grow(a.but_for.base_annual, incident_year, year);
        row.bf_gross = level * span.portion;
        row.bf_adjusted = row.bf_gross * aef.wage_factor;

        let fringe = but_for_fringe(&a.fringe, row.bf_gross, year, incident_year, span.portion)?
            .scaled(aef.fringe_factor);
        row.bf_fringe = fringe.total;
        row.bf_health_welfare = fringe.health_welfare;
        row.bf_pension = fringe.pension;
        row.bf_legals = a.legals.on(row.bf_gross) * aef.fringe_factor;

        // Actual earnings: a manual entry wins over automatic mitigation
        if let Some(entry) = a.overrides.get(&year) {
            row.act_earnings = entry.actual_earnings;
            row.act_fringe = entry.actual_fringe;
            row.overridden = true;
        } else if let Some(m) = &a.mitigation {
            if mid_year >= m.start_date {
                let growth = rates.mitigation_growth(m.growth_rate);
                let years = (year - m.start_date.year()).max(0);
                row.act_earnings = m.base_annual * (1.0 + growth).powi(years) * span.portion;
                row.act_fringe = row.act_earnings * m.fringe_pct;
            }
        }
        row.act_legals = a.legals.on(row.act_earnings);

        row.loss = (row.but_for_total() - row.actual_total()).max(0.0);
        self.split_loss(&mut row, span, rates, valuation_age)?;

        Ok(row)
    }

    /// Past/future split, prejudgment interest, discounting and survival
    ///
    /// Whole past or future rows are timed at the 1 July mid-year date, held
    /// on the right side of valuation. The valuation-year row is timed at the
    /// midpoint of each of its two parts instead.
    fn split_loss(&self, row: &mut YearRow, span: &YearSpan, rates: &ResolvedRates, valuation_age: Option<f64>) -> Result<()> {
        let valuation = self.assumptions.dates.valuation_date;

        match row.period {
            RowPeriod::Past => row.past = row.loss,
            RowPeriod::Future => row.future = row.loss,
            RowPeriod::Straddle => {
                row.past = row.loss * (span.past_years / span.portion);
                row.future = row.loss - row.past;
            }
        }

        let (past_at, future_at) = match row.period {
            RowPeriod::Straddle => (
                calendar::midpoint(span.start, span.past_end),
                calendar::midpoint(span.future_start, span.end),
            ),
            RowPeriod::Past | RowPeriod::Future => {
                let mid_year = calendar::mid_year_date(row.year)?;
                (mid_year.min(valuation), mid_year.max(valuation))
            }
        };

        row.past_with_interest = if row.past > 0.0 {
            row.past * rates.interest_factor(year_fraction(past_at, valuation))
        } else {
            row.past
        };

        if row.future > 0.0 {
            row.pv_future = row.future * rates.discount_factor(year_fraction(valuation, future_at));

            if let (Some(table), Some(dob), Some(from_age)) =
                (&self.assumptions.life_table, self.assumptions.dates.date_of_birth, valuation_age)
            {
                row.survival_prob = table.survival(from_age, calendar::age(dob, future_at)?);
            }
        } else {
            row.pv_future = row.future;
        }
        row.survival_weighted_future = row.pv_future * row.survival_prob;

        Ok(())
    }
}

/// Build the schedule for `assumptions` at the configured rates
pub fn build_schedule(assumptions: &Assumptions) -> Result<ScheduleResult> {
    ScheduleBuilder::new(assumptions.clone()).build()
}
