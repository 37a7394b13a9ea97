#![deny(unsafe_code)]

mod commands;
mod exit_code;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fastyet_core::{AggregateConfig, AggregateError, ConfigError, SizeReference, SourceError, System};

use crate::commands::{chart, check, summary};

/// Aggregate compiler benchmark results into chart data
#[derive(Parser)]
#[command(name = "fastyet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # Chart payload for every cataloged repository
    fastyet --data-dir site/data chart --pretty > charts.json

    # Latest timings and their change per series
    fastyet --data-dir site/data summary --repo ripgrep

    # Fail CI when a machine is missing buckets
    fastyet --data-dir site/data check
")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file with aggregation settings
    #[arg(long, value_name = "FILE", env = "FASTYET_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the catalog and result files
    #[arg(short, long, value_name = "DIR", env = "FASTYET_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog file name inside the data directory
    #[arg(long, value_name = "NAME", global = true)]
    catalog_file: Option<String>,

    /// Result files are the files whose name starts with this prefix
    #[arg(long, value_name = "PREFIX", global = true)]
    results_prefix: Option<String>,

    /// Result file to take binary sizes from: `first`, or a core count
    #[arg(long, value_name = "first|CORES", value_parser = parse_size_reference, global = true)]
    size_reference: Option<SizeReference>,

    /// Warn instead of failing when a cataloged repository has no data
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chart payload as JSON
    Chart(chart::Args),

    /// Show the latest value and change of every series
    Summary(summary::Args),

    /// Report skipped inputs and incomplete data
    Check(check::Args),
}

fn parse_size_reference(value: &str) -> Result<SizeReference, String> {
    if value.eq_ignore_ascii_case("first") {
        return Ok(SizeReference::First);
    }
    let cores: u32 = value
        .parse()
        .map_err(|_| format!("expected `first` or a core count, got {value:?}"))?;
    System::from_cores(cores).map_err(|e| e.to_string())?;
    Ok(SizeReference::Cores(cores))
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(categorize_error(&e))
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    tracing::debug!("Effective config: {:?}", config);

    match &cli.command {
        Commands::Chart(args) => chart::execute(&config, args),
        Commands::Summary(args) => summary::execute(&config, args),
        Commands::Check(args) => check::execute(&config, args),
    }
}

/// Defaults, then the config file, then flags and environment.
fn resolve_config(cli: &Cli) -> Result<AggregateConfig> {
    let mut config = match &cli.config {
        Some(path) => AggregateConfig::load(path)?,
        None => AggregateConfig::default(),
    };

    if let Some(data_dir) = &cli.data_dir {
        config.data_dir.clone_from(data_dir);
    }
    if let Some(catalog_file) = &cli.catalog_file {
        config.catalog_file.clone_from(catalog_file);
    }
    if let Some(results_prefix) = &cli.results_prefix {
        config.results_prefix.clone_from(results_prefix);
    }
    if let Some(size_reference) = cli.size_reference {
        config.size_reference = size_reference;
    }
    if cli.lenient {
        config.strict = false;
    }

    if !config.data_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("data directory {} does not exist", config.data_dir.display()),
        ))
        .context("Invalid --data-dir");
    }

    Ok(config)
}

fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

/// Categorize an error into an exit code by walking the error chain.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return match config_err {
                ConfigError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => exit_code::NOT_FOUND,
                ConfigError::Io { .. } => exit_code::GENERAL_ERROR,
                ConfigError::Parse { .. } => exit_code::CONFIG_ERROR,
            };
        }

        if let Some(aggregate_err) = cause.downcast_ref::<AggregateError>() {
            match aggregate_err {
                AggregateError::MissingRepoData { .. } => return exit_code::DATA_ERROR,
                AggregateError::Source(source_err) => return categorize_source_error(source_err),
                _ => {}
            }
        }

        if let Some(source_err) = cause.downcast_ref::<SourceError>() {
            return categorize_source_error(source_err);
        }

        if let Some(io_err) = cause.downcast_ref::<io::Error>()
            && io_err.kind() == io::ErrorKind::NotFound
        {
            return exit_code::NOT_FOUND;
        }
    }

    exit_code::GENERAL_ERROR
}

fn categorize_source_error(e: &SourceError) -> u8 {
    match e {
        SourceError::MissingCatalog { .. } => exit_code::NOT_FOUND,
        SourceError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => exit_code::NOT_FOUND,
        SourceError::Io { .. } => exit_code::GENERAL_ERROR,
        SourceError::Json { .. } => exit_code::DATA_ERROR,
    }
}
