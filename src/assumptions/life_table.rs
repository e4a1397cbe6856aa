//! Period life table used to survival-weight future losses
//!
//! Annual death probabilities (qx) are indexed by integer age. Survival over
//! a fractional span assumes deaths are uniformly distributed within each
//! year of age.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Life table keyed by integer age
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifeTable {
    /// Annual probability of death at each age
    pub qx: BTreeMap<u32, f64>,

    /// Publication the rates come from (e.g. a national vital statistics table)
    #[serde(default)]
    pub source: Option<String>,

    /// Population the table describes (male, female, combined)
    #[serde(default)]
    pub population: Option<String>,
}

impl LifeTable {
    pub fn new(qx: BTreeMap<u32, f64>) -> Self {
        Self {
            qx,
            source: None,
            population: None,
        }
    }

    /// Annual death probability at an age
    ///
    /// Ages past the end of the table use the oldest rate; missing interior
    /// ages use the nearest lower age.
    pub fn annual_rate(&self, age: u32) -> f64 {
        self.qx
            .range(..=age)
            .next_back()
            .or_else(|| self.qx.iter().next())
            .map(|(_, &q)| q.clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// Probability of surviving from `from_age` to `to_age`
    pub fn survival(&self, from_age: f64, to_age: f64) -> f64 {
        if self.qx.is_empty() || to_age <= from_age {
            return 1.0;
        }

        let mut survival = 1.0;
        let mut age = from_age.max(0.0);
        while age < to_age {
            let whole = age.floor();
            let next = (whole + 1.0).min(to_age);
            let q = self.annual_rate(whole as u32);
            survival *= 1.0 - (next - age) * q;
            age = next;
        }
        survival.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn table() -> LifeTable {
        LifeTable::new((60..=65).map(|age| (age, 0.01 * (age - 59) as f64)).collect())
    }

    #[test]
    fn test_annual_rate_lookup() {
        let t = table();
        assert_abs_diff_eq!(t.annual_rate(60), 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(t.annual_rate(65), 0.06, epsilon = 1e-12);
        // Beyond the table
        assert_abs_diff_eq!(t.annual_rate(90), 0.06, epsilon = 1e-12);
        // Before the table
        assert_abs_diff_eq!(t.annual_rate(30), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_whole_year_survival() {
        let s = table().survival(60.0, 62.0);
        assert_abs_diff_eq!(s, 0.99 * 0.98, epsilon = 1e-12);
    }

    #[test]
    fn test_fractional_survival() {
        let s = table().survival(60.5, 61.25);
        assert_abs_diff_eq!(s, (1.0 - 0.5 * 0.01) * (1.0 - 0.25 * 0.02), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_table_survives() {
        assert_eq!(LifeTable::default().survival(40.0, 80.0), 1.0);
        assert_eq!(table().survival(62.0, 61.0), 1.0);
    }
}
