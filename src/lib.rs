//! Forensic Damages - economic loss schedules for personal injury, medical
//! malpractice and wrongful death cases
//!
//! This library provides:
//! - Actual/Actual calendar arithmetic for partial years, ages and horizons
//! - Rate resolution for nominal, real and net-discount-rate methods
//! - The Adjustment to Earnings Formula (AEF) and fringe benefit calculators
//! - A year-by-year schedule of but-for vs. actual earnings, split into past
//!   (with prejudgment interest) and future (discounted) losses
//! - A rate sensitivity grid and retirement-age scenarios

pub mod assumptions;
pub mod calendar;
pub mod error;
pub mod provenance;
pub mod scenario;
pub mod schedule;

// Re-export commonly used types
pub use assumptions::{Assumptions, CaseType, ManualOverride};
pub use error::{DamagesError, Result};
pub use provenance::Provenance;
pub use scenario::{RetirementConfig, ScenarioOutcome, ScenarioRunner, SensitivityConfig, SensitivityGrid};
pub use schedule::{build_schedule, RateShift, ScheduleBuilder, ScheduleResult, YearRow};
