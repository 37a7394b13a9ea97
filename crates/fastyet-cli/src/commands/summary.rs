//! Summary command - latest value and change of every series.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use comfy_table::{Cell, CellAlignment, Color, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use tracing::instrument;

use fastyet_core::delta::latest_change;
use fastyet_core::{AggregateConfig, ChartData, CompilerMode, assemble_from};

use super::OutputFormat;
use crate::exit_code;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Only summarize this repository
    #[arg(long)]
    pub repo: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    repo: String,
    series: String,
    unit: &'static str,
    version: String,
    value: f64,
    previous: Option<String>,
    delta: Option<f64>,
}

#[instrument(level = "info", name = "cmd::summary", skip_all)]
pub fn execute(config: &AggregateConfig, args: &Args) -> Result<u8> {
    let assembly = assemble_from(&config.directory_source(), config).context("Failed to assemble chart data")?;

    let mut rows = Vec::new();
    for chart in &assembly.charts {
        if args.repo.as_ref().is_some_and(|name| name != &chart.repo.name) {
            continue;
        }
        rows.extend(summarize(chart));
    }

    if let Some(name) = &args.repo
        && !assembly.charts.iter().any(|c| &c.repo.name == name)
    {
        anyhow::bail!("Repository {name:?} is not in the catalog");
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No data");
            } else {
                println!("{}", render_table(&rows));
            }
        }
    }

    Ok(exit_code::SUCCESS)
}

fn summarize(chart: &ChartData) -> Vec<SummaryRow> {
    let sizes = CompilerMode::ALL
        .into_iter()
        .filter(|mode| mode.produces_binary())
        .map(|mode| mode.as_str().to_owned());

    let compile = chart.series_names().into_iter().map(|series| (series, "s", &chart.compile_times));
    let size = sizes.map(|series| (series, "MB", &chart.sizes));

    compile
        .chain(size)
        .filter_map(|(series, unit, points)| {
            let latest = latest_change(points, &series)?;
            Some(SummaryRow {
                repo: chart.repo.name.clone(),
                series,
                unit,
                version: latest.version.to_string(),
                value: latest.value,
                previous: latest.previous.map(|v| v.to_string()),
                delta: latest.delta,
            })
        })
        .collect()
}

fn render_table(rows: &[SummaryRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Repository", "Series", "Version", "Value", "Since", "Change"]);

    for row in rows {
        let value = match row.unit {
            "MB" => format!("{:.3} MB", row.value),
            _ => format!("{:.2} s", row.value),
        };
        let change = match row.delta {
            // Positive means the newer version is faster or smaller.
            Some(delta) if delta > 0.0 => Cell::new(format!("{delta:+.1}%")).fg(Color::Green),
            Some(delta) if delta < 0.0 => Cell::new(format!("{delta:+.1}%")).fg(Color::Red),
            Some(delta) => Cell::new(format!("{delta:.1}%")),
            None => Cell::new("-"),
        };
        table.add_row(vec![
            Cell::new(&row.repo),
            Cell::new(&row.series),
            Cell::new(&row.version),
            Cell::new(value).set_alignment(CellAlignment::Right),
            Cell::new(row.previous.as_deref().unwrap_or("-")),
            change.set_alignment(CellAlignment::Right),
        ]);
    }

    table
}
