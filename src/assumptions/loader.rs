//! Assumption loaders
//!
//! The case record is JSON. Tabular inputs (wage growth, contract fringe
//! rates, life tables) are CSV files that can be merged into a loaded case.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use log::info;
use serde::Deserialize;

use super::{Assumptions, ContractRate, ContractSchedule, Employment, LifeTable, WageGrowthTable, WageStep};
use crate::error::{DamagesError, Result};

/// Load a case from a JSON file
pub fn load_assumptions<P: AsRef<Path>>(path: P) -> Result<Assumptions> {
    let file = File::open(path.as_ref())?;
    let assumptions = load_assumptions_from_reader(file)?;
    info!("Loaded assumptions from {}", path.as_ref().display());
    Ok(assumptions)
}

/// Load a case from any JSON reader
pub fn load_assumptions_from_reader<R: Read>(reader: R) -> Result<Assumptions> {
    Ok(serde_json::from_reader(reader)?)
}

/// Raw row of a wage growth CSV: `year,kind,value`
#[derive(Debug, Deserialize)]
struct WageRow {
    year: i32,
    kind: String,
    value: f64,
}

impl WageRow {
    fn to_step(&self) -> Result<WageStep> {
        match self.kind.trim().to_ascii_lowercase().as_str() {
            "rate" | "pct" | "percent" => Ok(WageStep::Rate(self.value)),
            "amount" | "dollar" => Ok(WageStep::Amount(self.value)),
            other => Err(DamagesError::InvalidInput(format!(
                "unknown wage step kind '{}' for {}",
                other, self.year
            ))),
        }
    }
}

/// Load a wage growth table from CSV
pub fn load_wage_table<P: AsRef<Path>>(path: P) -> Result<WageGrowthTable> {
    let mut table = load_wage_table_from_reader(File::open(path.as_ref())?)?;
    table.source = Some(path.as_ref().display().to_string());
    Ok(table)
}

pub fn load_wage_table_from_reader<R: Read>(reader: R) -> Result<WageGrowthTable> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut steps = BTreeMap::new();

    for result in csv_reader.deserialize() {
        let row: WageRow = result?;
        steps.insert(row.year, row.to_step()?);
    }

    Ok(WageGrowthTable::new(steps))
}

/// Raw row of a contract rates CSV
#[derive(Debug, Deserialize)]
struct ContractRow {
    start_year: i32,
    end_year: i32,
    classification: String,
    employment: String,
    hw_hourly: f64,
    weekly_total_increase: f64,
}

impl ContractRow {
    fn to_rate(self) -> Result<ContractRate> {
        let employment = Employment::parse(&self.employment).ok_or_else(|| {
            DamagesError::InvalidInput(format!("unknown employment basis '{}'", self.employment))
        })?;
        if self.start_year > self.end_year {
            return Err(DamagesError::InvalidInput(format!(
                "contract period {}-{} for '{}' ends before it starts",
                self.start_year, self.end_year, self.classification
            )));
        }

        Ok(ContractRate {
            start_year: self.start_year,
            end_year: self.end_year,
            classification: self.classification.trim().to_string(),
            employment,
            hw_hourly: self.hw_hourly,
            weekly_total_increase: self.weekly_total_increase,
        })
    }
}

/// Load contract-period fringe rates from CSV
pub fn load_contract_rates<P: AsRef<Path>>(path: P) -> Result<ContractSchedule> {
    load_contract_rates_from_reader(File::open(path)?)
}

pub fn load_contract_rates_from_reader<R: Read>(reader: R) -> Result<ContractSchedule> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rates = Vec::new();

    for result in csv_reader.deserialize() {
        let row: ContractRow = result?;
        rates.push(row.to_rate()?);
    }

    rates.sort_by(|a, b| {
        (&a.classification, a.start_year).cmp(&(&b.classification, b.start_year))
    });
    Ok(ContractSchedule::new(rates))
}

/// Load a life table (`age,qx`) from CSV
pub fn load_life_table<P: AsRef<Path>>(path: P) -> Result<LifeTable> {
    let mut table = load_life_table_from_reader(File::open(path.as_ref())?)?;
    table.source = Some(path.as_ref().display().to_string());
    Ok(table)
}

pub fn load_life_table_from_reader<R: Read>(reader: R) -> Result<LifeTable> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut qx = BTreeMap::new();

    for result in csv_reader.records() {
        let record = result?;
        let age: u32 = parse_field(&record, 0, "age")?;
        let rate: f64 = parse_field(&record, 1, "qx")?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(DamagesError::InvalidInput(format!("qx {} at age {} is not a probability", rate, age)));
        }
        qx.insert(age, rate);
    }

    Ok(LifeTable::new(qx))
}

fn parse_field<T: std::str::FromStr>(record: &csv::StringRecord, index: usize, name: &str) -> Result<T> {
    let raw = record
        .get(index)
        .ok_or_else(|| DamagesError::InvalidInput(format!("missing column '{}'", name)))?;
    raw.trim()
        .parse()
        .map_err(|_| DamagesError::InvalidInput(format!("bad {} value '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::FringeMethod;

    #[test]
    fn test_load_assumptions_with_defaults() {
        let json = r#"{
            "dates": {"incident_date": "2023-06-20", "valuation_date": "2025-01-15"},
            "horizon": {"wle_years": 20.5},
            "but_for": {"base_annual": 65000.0, "growth_rate": 0.03},
            "overrides": {"2024": {"actE": 18000.0}}
        }"#;
        let a = load_assumptions_from_reader(json.as_bytes()).unwrap();
        assert_eq!(a.but_for.base_annual, 65_000.0);
        assert_eq!(a.fringe, FringeMethod::None);
        assert!(!a.aef.enabled);
        assert!(a.discount.enabled);
        assert_eq!(a.overrides[&2024].actual_earnings, 18_000.0);
    }

    #[test]
    fn test_load_assumptions_rejects_bad_date() {
        let json = r#"{
            "dates": {"incident_date": "2023-02-30", "valuation_date": "2025-01-15"},
            "but_for": {"base_annual": 1.0}
        }"#;
        assert!(matches!(load_assumptions_from_reader(json.as_bytes()), Err(DamagesError::Json(_))));
    }

    #[test]
    fn test_load_wage_table() {
        let data = "year,kind,value\n2024,rate,0.04\n2025,amount,1500\n";
        let table = load_wage_table_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.step(2024), Some(WageStep::Rate(0.04)));
        assert_eq!(table.step(2025), Some(WageStep::Amount(1500.0)));
    }

    #[test]
    fn test_wage_table_rejects_unknown_kind() {
        let data = "year,kind,value\n2024,bonus,0.04\n";
        assert!(matches!(
            load_wage_table_from_reader(data.as_bytes()),
            Err(DamagesError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_contract_rates() {
        let data = "start_year,end_year,classification,employment,hw_hourly,weekly_total_increase\n\
                    2023,2027,driver,full_time,12.5,780\n\
                    2018,2022,driver,FT,11.0,700\n\
                    2023,2027,driver,part-time,6.0,390\n";
        let schedule = load_contract_rates_from_reader(data.as_bytes()).unwrap();
        assert_eq!(schedule.rates.len(), 3);
        assert_eq!(schedule.rates[0].start_year, 2018);
        let r = schedule.rates_for(2025, "driver", Employment::PartTime).unwrap();
        assert_eq!(r.hw_hourly, 6.0);
    }

    #[test]
    fn test_contract_rates_reject_inverted_period() {
        let data = "start_year,end_year,classification,employment,hw_hourly,weekly_total_increase\n\
                    2027,2023,driver,full_time,12.5,780\n";
        assert!(load_contract_rates_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_load_life_table() {
        let data = "age,qx\n45,0.0031\n46,0.0034\n";
        let table = load_life_table_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.qx.len(), 2);
        assert_eq!(table.annual_rate(46), 0.0034);
    }

    #[test]
    fn test_life_table_rejects_bad_probability() {
        let data = "age,qx\n45,1.5\n";
        assert!(load_life_table_from_reader(data.as_bytes()).is_err());
    }
}
