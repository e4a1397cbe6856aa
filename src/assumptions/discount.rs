//! Discounting and prejudgment interest configuration

use serde::{Deserialize, Serialize};

/// How future losses are brought to present value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMethod {
    /// Grow earnings at the nominal growth rate and discount at a nominal rate
    #[default]
    Nominal,
    /// Hold earnings constant and discount at a real rate
    Real,
    /// Hold earnings constant and discount at a net discount rate
    Ndr,
}

impl DiscountMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountMethod::Nominal => "nominal",
            DiscountMethod::Real => "real",
            DiscountMethod::Ndr => "ndr",
        }
    }
}

/// Discount configuration as entered for the case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountConfig {
    #[serde(default)]
    pub method: DiscountMethod,

    /// Nominal discount rate
    #[serde(default)]
    pub nominal_rate: f64,

    /// Real discount rate
    #[serde(default)]
    pub real_rate: f64,

    /// Net discount rate
    #[serde(default)]
    pub ndr: f64,

    /// Jurisdictions that do not discount future losses set this to false
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether past losses accrue prejudgment interest
    #[serde(default)]
    pub prejudgment_interest: bool,

    /// Explicit prejudgment interest rate; derived from the method if absent
    #[serde(default)]
    pub interest_rate: Option<f64>,
}

fn default_true() -> bool {
    true
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            method: DiscountMethod::Nominal,
            nominal_rate: 0.0,
            real_rate: 0.0,
            ndr: 0.0,
            enabled: true,
            prejudgment_interest: false,
            interest_rate: None,
        }
    }
}

impl DiscountConfig {
    /// The configured rate for the selected method
    pub fn method_rate(&self) -> f64 {
        match self.method {
            DiscountMethod::Nominal => self.nominal_rate,
            DiscountMethod::Real => self.real_rate,
            DiscountMethod::Ndr => self.ndr,
        }
    }
}
