//! Check command - report skipped inputs and incomplete data.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use fastyet_core::{AggregateConfig, CoverageGap, DocumentSource, assemble, find_coverage_gaps};

use super::OutputFormat;
use crate::exit_code;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Only report skipped inputs, not coverage gaps
    #[arg(long)]
    pub no_coverage: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    warnings: Vec<String>,
    gaps: &'a [CoverageGap],
}

#[instrument(level = "info", name = "cmd::check", skip_all)]
pub fn execute(config: &AggregateConfig, args: &Args) -> Result<u8> {
    let source = config.directory_source();
    let catalog = source.catalog().context("Failed to load repository catalog")?;
    let results = source.results().context("Failed to load result files")?;

    // Missing repository data is one of the things being checked for.
    let lenient = AggregateConfig {
        strict: false,
        ..config.clone()
    };
    let assembly = assemble(&catalog, &results, &lenient).context("Failed to assemble chart data")?;
    let gaps = if args.no_coverage {
        Vec::new()
    } else {
        find_coverage_gaps(&catalog, &results)
    };

    let warnings: Vec<String> = assembly.warnings.iter().map(ToString::to_string).collect();
    let clean = warnings.is_empty() && gaps.is_empty();

    match args.format {
        OutputFormat::Json => {
            let report = Report {
                warnings,
                gaps: &gaps,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            for warning in &warnings {
                println!("warning: {warning}");
            }
            for gap in &gaps {
                println!("gap: {gap}");
            }
            println!(
                "Checked {} repositories across {} result files: {} warnings, {} coverage gaps",
                catalog.len(),
                results.len(),
                warnings.len(),
                gaps.len()
            );
        }
    }

    if clean {
        Ok(exit_code::SUCCESS)
    } else {
        Ok(exit_code::ISSUES_FOUND)
    }
}
