//! Provenance of a computation: which assumptions, when, from what sources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::assumptions::Assumptions;
use crate::error::Result;

/// Audit record accompanying a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// SHA-256 of the canonical JSON form of the assumptions
    pub fingerprint: String,
    pub generated_at: DateTime<Utc>,
    pub case_name: Option<String>,
    pub sources: Vec<String>,
}

impl Provenance {
    pub fn new(assumptions: &Assumptions) -> Result<Self> {
        Ok(Self {
            fingerprint: fingerprint(assumptions)?,
            generated_at: Utc::now(),
            case_name: assumptions.meta.case_name.clone(),
            sources: sources(assumptions),
        })
    }
}

/// Hex SHA-256 of the assumptions' JSON
///
/// Field order is fixed by the struct layout and override keys are sorted, so
/// equal assumptions always hash the same.
pub fn fingerprint(assumptions: &Assumptions) -> Result<String> {
    let canonical = serde_json::to_vec(assumptions)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("{:x}", hasher.finalize()))
}

fn sources(a: &Assumptions) -> Vec<String> {
    let mut sources = Vec::new();
    if let Some(table) = &a.life_table {
        let name = table.source.as_deref().unwrap_or("unnamed life table");
        match &table.population {
            Some(population) => sources.push(format!("Life table: {} ({})", name, population)),
            None => sources.push(format!("Life table: {}", name)),
        }
    }
    if let Some(source) = a.but_for.wage_table.as_ref().and_then(|t| t.source.as_ref()) {
        sources.push(format!("Wage growth table: {}", source));
    }
    if let Some(notes) = &a.meta.wage_source_notes {
        sources.push(format!("Wage documentation: {}", notes));
    }
    if let Some(notes) = &a.meta.benefit_source_notes {
        sources.push(format!("Fringe/benefit documentation: {}", notes));
    }
    sources
}
