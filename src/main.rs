//! Forensic Damages CLI
//!
//! Loads a case, builds the damages schedule and prints a JSON report.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use forensic_damages::assumptions::{loader, validate_ranges, FringeMethod, RangeViolation};
use forensic_damages::scenario::RetirementScenario;
use forensic_damages::{
    Provenance, RetirementConfig, ScenarioRunner, ScheduleResult, SensitivityConfig, SensitivityGrid,
};

#[derive(Parser, Debug)]
#[command(
    name = "forensic_damages",
    about = "Lost earnings schedule with sensitivity grid and retirement scenarios"
)]
struct Cli {
    /// Case assumptions (JSON)
    #[arg(long)]
    assumptions: PathBuf,

    /// Wage growth table (CSV: year,kind,value)
    #[arg(long)]
    wage_table: Option<PathBuf>,

    /// Contract fringe rates (CSV), used by composite fringe
    #[arg(long)]
    contract_rates: Option<PathBuf>,

    /// Life table (CSV: age,qx)
    #[arg(long)]
    life_table: Option<PathBuf>,

    /// Include the discount/growth sensitivity grid
    #[arg(long)]
    grid: bool,

    /// Include retirement-age scenarios
    #[arg(long)]
    retirement: bool,

    /// Fixed retirement ages for the scenarios
    #[arg(long, value_delimiter = ',', default_values_t = [65.0, 67.0, 70.0])]
    ages: Vec<f64>,

    /// Also write the base schedule rows to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Report {
    provenance: Provenance,
    warnings: Vec<RangeViolation>,
    schedule: ScheduleResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity: Option<SensitivityGrid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retirement_scenarios: Option<Vec<RetirementScenario>>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut assumptions = loader::load_assumptions(&cli.assumptions)
        .with_context(|| format!("loading assumptions from {}", cli.assumptions.display()))?;

    if let Some(path) = &cli.wage_table {
        let table = loader::load_wage_table(path)
            .with_context(|| format!("loading wage table from {}", path.display()))?;
        assumptions.but_for.wage_table = Some(table);
    }

    if let Some(path) = &cli.contract_rates {
        let schedule = loader::load_contract_rates(path)
            .with_context(|| format!("loading contract rates from {}", path.display()))?;
        match &mut assumptions.fringe {
            FringeMethod::Composite(composite) => composite.schedule = schedule,
            _ => anyhow::bail!("--contract-rates requires a composite fringe method in the assumptions"),
        }
    }

    if let Some(path) = &cli.life_table {
        let table = loader::load_life_table(path)
            .with_context(|| format!("loading life table from {}", path.display()))?;
        assumptions.life_table = Some(table);
    }

    let warnings = validate_ranges(&assumptions);
    let provenance = Provenance::new(&assumptions).context("fingerprinting assumptions")?;
    let runner = ScenarioRunner::with_assumptions(assumptions);

    let schedule = runner.run_base().context("building damages schedule")?;
    info!(
        "Base schedule: past {:.2}, future PV {:.2}, total {:.2}",
        schedule.totals.past, schedule.totals.future_pv, schedule.totals.total
    );

    if let Some(path) = &cli.csv {
        write_rows(path, &schedule).with_context(|| format!("writing schedule CSV to {}", path.display()))?;
    }

    let sensitivity = cli.grid.then(|| runner.run_sensitivity(&SensitivityConfig::default()));
    let retirement_scenarios = if cli.retirement {
        let config = RetirementConfig { fixed_ages: cli.ages.clone() };
        Some(runner.run_retirement(&config).context("building retirement scenarios")?)
    } else {
        None
    };

    let report = Report {
        provenance,
        warnings,
        schedule,
        sensitivity,
        retirement_scenarios,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut out, &report)?;
    } else {
        serde_json::to_writer(&mut out, &report)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_rows(path: &Path, schedule: &ScheduleResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "year", "age", "portion", "period", "bf_gross", "bf_adjusted", "bf_fringe", "bf_health_welfare",
        "bf_pension", "bf_legals", "act_earnings", "act_fringe", "act_legals", "overridden", "loss", "past",
        "past_with_interest", "future", "pv_future", "survival_prob", "survival_weighted_future",
    ])?;

    for row in &schedule.rows {
        writer.write_record([
            row.year.to_string(),
            row.age.map(|a| format!("{:.4}", a)).unwrap_or_default(),
            format!("{:.6}", row.portion),
            format!("{:?}", row.period).to_lowercase(),
            format!("{:.2}", row.bf_gross),
            format!("{:.2}", row.bf_adjusted),
            format!("{:.2}", row.bf_fringe),
            format!("{:.2}", row.bf_health_welfare),
            format!("{:.2}", row.bf_pension),
            format!("{:.2}", row.bf_legals),
            format!("{:.2}", row.act_earnings),
            format!("{:.2}", row.act_fringe),
            format!("{:.2}", row.act_legals),
            row.overridden.to_string(),
            format!("{:.2}", row.loss),
            format!("{:.2}", row.past),
            format!("{:.2}", row.past_with_interest),
            format!("{:.2}", row.future),
            format!("{:.2}", row.pv_future),
            format!("{:.6}", row.survival_prob),
            format!("{:.2}", row.survival_weighted_future),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
