//! Plan a batch of cases from the command line.
//!
//! ```text
//! surgery-planner <cases.json> [config.json]
//! ```
//!
//! `cases.json` holds an array of case payloads. The plan is printed to
//! stdout as JSON; logs go to stderr and follow `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use surgery_planner_core::{PlannerConfig, RawCase, SurgeryPlanner};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args_os().skip(1);
    let Some(cases_path) = args.next().map(PathBuf::from) else {
        bail!("usage: surgery-planner <cases.json> [config.json]");
    };
    let config = match args.next() {
        Some(path) => PlannerConfig::load(&path)
            .with_context(|| format!("loading config {}", PathBuf::from(&path).display()))?,
        None => PlannerConfig::default(),
    };

    let json = std::fs::read_to_string(&cases_path)
        .with_context(|| format!("reading {}", cases_path.display()))?;
    let raws: Vec<RawCase> = serde_json::from_str(&json)
        .with_context(|| format!("parsing {}", cases_path.display()))?;

    let planner = SurgeryPlanner::from_config(&config).context("building planner")?;
    let outcome = planner.plan(&raws)?;

    let priorities: Vec<_> = outcome
        .priorities
        .iter()
        .map(|(id, priority)| serde_json::json!({ "id": id, "priority": priority.label() }))
        .collect();
    let rejected: Vec<String> = outcome.rejected.iter().map(ToString::to_string).collect();

    let report = serde_json::json!({
        "schedule": outcome.schedule,
        "priorities": priorities,
        "held": outcome.held,
        "rejected": rejected,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
