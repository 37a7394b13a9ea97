//! Chart payload assembly.
//!
//! Joins the merged compile-time series and the size series against the
//! repository catalog, producing one [`ChartData`] per cataloged repository
//! in catalog order.

use tracing::instrument;

use crate::chart::ChartData;
use crate::config::AggregateConfig;
use crate::error::{AggregateError, DataSection, Warning};
use crate::merge::{RepoTimings, merge_compile_times};
use crate::model::{Repo, ResultFile};
use crate::sizes::{ExtractedSizes, choose_size_reference, extract_sizes};
use crate::source::DocumentSource;

/// The assembled payload plus every non-fatal problem met on the way.
#[derive(Debug, Default)]
pub struct Assembly {
    /// One entry per cataloged repository, in catalog order.
    pub charts: Vec<ChartData>,
    /// Skipped inputs from merging, size extraction and lenient assembly.
    pub warnings: Vec<Warning>,
}

/// Assemble chart data for every repository in `catalog`.
///
/// A cataloged repository with no compile-time or no size data is an error
/// when `config.strict` is set, otherwise it gets empty series and a warning.
#[instrument(level = "info", skip_all, fields(repos = catalog.len(), files = results.len()))]
pub fn assemble(catalog: &[Repo], results: &[ResultFile], config: &AggregateConfig) -> Result<Assembly, AggregateError> {
    let names: Vec<&str> = catalog.iter().map(|r| r.name.as_str()).collect();

    let merged = merge_compile_times(&names, results);
    let sizes = match choose_size_reference(results, config.size_reference) {
        Some(reference) => {
            tracing::debug!(
                "Using the {}-core result file from {} as size reference",
                reference.system_info.num_cores,
                reference.system_info.cpu_model
            );
            extract_sizes(&names, &reference.profiles)
        }
        None => {
            tracing::warn!("No result file matches size reference {:?}", config.size_reference);
            ExtractedSizes::default()
        }
    };

    let mut warnings = merged.warnings;
    warnings.extend(sizes.warnings);

    let mut charts = Vec::with_capacity(catalog.len());
    for repo in catalog {
        let timings = match merged.repos.get(&repo.name) {
            Some(timings) => timings.clone(),
            None => {
                missing(repo, DataSection::CompileTimes, config.strict, &mut warnings)?;
                RepoTimings::default()
            }
        };
        let size_points = match sizes.repos.get(&repo.name) {
            Some(points) => points.clone(),
            None => {
                missing(repo, DataSection::Sizes, config.strict, &mut warnings)?;
                Vec::new()
            }
        };

        charts.push(ChartData {
            repo: repo.clone(),
            compile_times: timings.points,
            sizes: size_points,
            intervals: timings.intervals,
        });
    }

    if !warnings.is_empty() {
        tracing::info!("Assembled {} charts with {} warnings", charts.len(), warnings.len());
    }
    Ok(Assembly { charts, warnings })
}

fn missing(
    repo: &Repo,
    section: DataSection,
    strict: bool,
    warnings: &mut Vec<Warning>,
) -> Result<(), AggregateError> {
    let error = AggregateError::MissingRepoData {
        repo: repo.name.clone(),
        section,
    };
    if strict {
        return Err(error);
    }
    tracing::warn!("{}", error);
    warnings.push(Warning::for_repo(&repo.name, error));
    Ok(())
}

/// Read the documents from `source` and assemble them.
#[instrument(level = "info", skip_all)]
pub fn assemble_from(source: &impl DocumentSource, config: &AggregateConfig) -> Result<Assembly, AggregateError> {
    let catalog = source.catalog()?;
    let results = source.results()?;
    assemble(&catalog, &results, config)
}
