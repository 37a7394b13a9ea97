//! Chart command - print the chart payload as JSON.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use fastyet_core::{AggregateConfig, ChartData, assemble_from};

use crate::exit_code;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Only emit this repository
    #[arg(long)]
    pub repo: Option<String>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[instrument(level = "info", name = "cmd::chart", skip_all)]
pub fn execute(config: &AggregateConfig, args: &Args) -> Result<u8> {
    let assembly = assemble_from(&config.directory_source(), config).context("Failed to assemble chart data")?;

    let charts: Vec<&ChartData> = match &args.repo {
        Some(name) => {
            let charts: Vec<_> = assembly.charts.iter().filter(|c| &c.repo.name == name).collect();
            if charts.is_empty() {
                anyhow::bail!("Repository {name:?} is not in the catalog");
            }
            charts
        }
        None => assembly.charts.iter().collect(),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&charts)?
    } else {
        serde_json::to_string(&charts)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n").with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} charts to {}", charts.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    if !assembly.warnings.is_empty() {
        eprintln!("{} inputs were skipped; run `fastyet check` for details", assembly.warnings.len());
    }

    Ok(exit_code::SUCCESS)
}
