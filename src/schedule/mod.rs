//! Damages schedule: rate resolution, AEF, fringe and the year-by-year builder

mod aef;
mod builder;
mod fringe;
mod rates;
mod rows;

pub use aef::AefFactors;
pub use builder::{build_schedule, ScheduleBuilder};
pub use fringe::{but_for_fringe, FringeAmounts};
pub use rates::{RateShift, ResolvedRates};
pub use rows::{RowPeriod, ScheduleResult, ScheduleTotals, YearRow};
