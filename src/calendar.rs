//! Calendar arithmetic on Actual/Actual (ISDA) day counts
//!
//! Every span in a damages schedule (year portions, ages, interest and
//! discount periods) is measured with the same convention: the days falling
//! in each calendar year are divided by that year's length (365 or 366) and
//! the pieces are summed.

use chrono::{Datelike, Days, Duration, NaiveDate};

use crate::error::{DamagesError, Result};

/// Month and day used as the mid-year date of every calendar year
pub const MID_YEAR: (u32, u32) = (7, 1);

/// Whether `year` has a 29 February
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|d| d.leap_year())
}

/// Number of days in `year` (365 or 366)
pub fn days_in_year(year: i32) -> f64 {
    if is_leap_year(year) {
        366.0
    } else {
        365.0
    }
}

/// Signed year fraction between two dates (Actual/Actual ISDA)
///
/// Returns a negative value when `start > end`.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> f64 {
    if start > end {
        return -year_fraction(end, start);
    }

    let (start_year, end_year) = (start.year(), end.year());
    if start_year == end_year {
        return (end.ordinal0() - start.ordinal0()) as f64 / days_in_year(start_year);
    }

    let head = (days_in_year(start_year) - start.ordinal0() as f64) / days_in_year(start_year);
    let tail = end.ordinal0() as f64 / days_in_year(end_year);
    head + (end_year - start_year - 1) as f64 + tail
}

/// Year fraction for an interval that must be ordered (`start <= end`)
pub fn ordered_year_fraction(start: NaiveDate, end: NaiveDate) -> Result<f64> {
    if start > end {
        return Err(DamagesError::InvertedInterval { start, end });
    }
    Ok(year_fraction(start, end))
}

/// The anniversary of `date` falling in `year`
///
/// A 29 February anniversary in a non-leap year clamps to 28 February.
pub fn anniversary(date: NaiveDate, year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| {
            if date.month() == 2 && date.day() == 29 {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
        .ok_or_else(|| DamagesError::DateOutOfRange(format!("anniversary of {} in {}", date, year)))
}

/// Fractional age at `at` for someone born on `dob`
///
/// Whole years count anniversaries (with the 29 February clamp); the
/// remainder since the last anniversary is an Actual/Actual fraction.
pub fn age(dob: NaiveDate, at: NaiveDate) -> Result<f64> {
    if at < dob {
        return Err(DamagesError::InvertedInterval { start: dob, end: at });
    }

    let mut years = at.year() - dob.year();
    let mut last_birthday = anniversary(dob, at.year())?;
    if last_birthday > at {
        years -= 1;
        last_birthday = anniversary(dob, at.year() - 1)?;
    }

    Ok(years as f64 + year_fraction(last_birthday, at))
}

/// Offset `date` by a (possibly fractional, possibly negative) number of years
///
/// The whole part moves to the anniversary in the target year; the fraction
/// adds `round(fraction × days in that year)` days.
pub fn add_years(date: NaiveDate, years: f64) -> Result<NaiveDate> {
    if !years.is_finite() || years.abs() > 10_000.0 {
        return Err(DamagesError::DateOutOfRange(format!("{} + {} years", date, years)));
    }

    let whole = years.trunc();
    let fraction = years - whole;
    let anchor = anniversary(date, date.year() + whole as i32)?;
    let days = (fraction * days_in_year(anchor.year())).round() as i64;
    shift_days(anchor, days)
}

/// First day of `year`
pub fn year_start(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| DamagesError::DateOutOfRange(format!("start of year {}", year)))
}

/// Mid-year date of `year` under the mid-year convention
pub fn mid_year_date(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, MID_YEAR.0, MID_YEAR.1)
        .ok_or_else(|| DamagesError::DateOutOfRange(format!("mid-year of {}", year)))
}

/// Date halfway between `start` and `end` (rounded down to a whole day)
pub fn midpoint(start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    lo + Duration::days((hi - lo).num_days() / 2)
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| DamagesError::DateOutOfRange(format!("{} shifted by {} days", date, days)))
}
