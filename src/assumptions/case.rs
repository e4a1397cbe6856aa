//! Case classification and earnings-adjustment (AEF) parameters

use serde::{Deserialize, Serialize};

/// Type of the legal case
///
/// Personal consumption and maintenance deductions only exist for wrongful
/// death, so they live on that variant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaseType {
    /// Personal injury
    #[default]
    PersonalInjury,
    /// Medical malpractice
    MedicalMalpractice,
    /// Wrongful death, with the decedent's personal consumption (PC) and
    /// personal maintenance (PM) shares of earnings
    WrongfulDeath {
        personal_consumption: f64,
        personal_maintenance: f64,
    },
}

impl CaseType {
    /// (PC, PM) deductions for this case type; zero outside wrongful death
    pub fn consumption_terms(&self) -> (f64, f64) {
        match *self {
            CaseType::PersonalInjury | CaseType::MedicalMalpractice => (0.0, 0.0),
            CaseType::WrongfulDeath {
                personal_consumption,
                personal_maintenance,
            } => (personal_consumption, personal_maintenance),
        }
    }

    /// Short code used in reports
    pub fn code(&self) -> &'static str {
        match self {
            CaseType::PersonalInjury => "pi",
            CaseType::MedicalMalpractice => "mm",
            CaseType::WrongfulDeath { .. } => "wd",
        }
    }
}

/// How the AEF is applied to fringe benefits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FringeAefMode {
    /// Fringe is not adjusted (factor 1)
    #[default]
    None,
    /// Work-life and unemployment terms only
    Partial,
    /// Same factor as wages
    Full,
}

/// Parameters of the Adjustment to Earnings Formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AefParams {
    /// When false the wage and fringe factors are identically 1
    #[serde(default)]
    pub enabled: bool,

    /// Unemployment rate (UR)
    #[serde(default)]
    pub unemployment_rate: f64,

    /// Unemployment benefit replacement (URF)
    #[serde(default)]
    pub unemployment_replacement: f64,

    /// Federal income tax rate (TLF)
    #[serde(default)]
    pub federal_tax: f64,

    /// State income tax rate (TLS)
    #[serde(default)]
    pub state_tax: f64,

    #[serde(default)]
    pub fringe_mode: FringeAefMode,
}

impl Default for AefParams {
    fn default() -> Self {
        Self {
            enabled: false,
            unemployment_rate: 0.0,
            unemployment_replacement: 0.0,
            federal_tax: 0.0,
            state_tax: 0.0,
            fringe_mode: FringeAefMode::None,
        }
    }
}

impl AefParams {
    /// Effective unemployment: UR × (1 − URF)
    pub fn effective_unemployment(&self) -> f64 {
        self.unemployment_rate * (1.0 - self.unemployment_replacement)
    }

    /// Multiplicative tax stacking: 1 − (1 − TLF)(1 − TLS)
    pub fn effective_tax(&self) -> f64 {
        1.0 - (1.0 - self.federal_tax) * (1.0 - self.state_tax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_consumption_terms_only_for_wrongful_death() {
        assert_eq!(CaseType::PersonalInjury.consumption_terms(), (0.0, 0.0));
        assert_eq!(CaseType::MedicalMalpractice.consumption_terms(), (0.0, 0.0));
        let wd = CaseType::WrongfulDeath {
            personal_consumption: 0.25,
            personal_maintenance: 0.05,
        };
        assert_eq!(wd.consumption_terms(), (0.25, 0.05));
        assert_eq!(wd.code(), "wd");
    }

    #[test]
    fn test_effective_tax_is_multiplicative() {
        let aef = AefParams {
            federal_tax: 0.15,
            state_tax: 0.05,
            ..Default::default()
        };
        assert_abs_diff_eq!(aef.effective_tax(), 1.0 - 0.85 * 0.95, epsilon = 1e-12);
        assert!(aef.effective_tax() < 0.20);
    }

    #[test]
    fn test_case_type_json_tagging() {
        let json = r#"{"kind":"wrongful_death","personal_consumption":0.3,"personal_maintenance":0.1}"#;
        let case: CaseType = serde_json::from_str(json).unwrap();
        assert_eq!(case.consumption_terms(), (0.3, 0.1));

        let pi: CaseType = serde_json::from_str(r#"{"kind":"personal_injury"}"#).unwrap();
        assert_eq!(pi, CaseType::PersonalInjury);
    }

    #[test]
    fn test_case_type_defaults_to_personal_injury() {
        assert_eq!(CaseType::default(), CaseType::PersonalInjury);
        assert_eq!(CaseType::default().code(), "pi");
    }
}
