//! Merge compile-time buckets from several result files into one series per
//! repository.
//!
//! Every result file comes from one [`System`]. Each of its buckets
//! (`version, compilerMode, profileMode` → timings) lands on the chart point
//! for `version` under the series field `compilerMode,profileMode,system`.
//! Because the system is part of the field name, two files never write the
//! same field and the merge does not depend on file order.
//!
//! Two files for the same system (for instance a re-run on an identical
//! machine) pool their samples per bucket. Pooled samples are sorted before
//! the statistics are computed so the result is independent of file order
//! down to the last bit.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::instrument;

use crate::chart::{ChartPoint, SeriesPoint};
use crate::error::{AggregateError, Warning};
use crate::key::{SeriesKey, decode_compile_key};
use crate::model::{Profile, ResultFile};
use crate::stats::{EmptyInputError, Interval};
use crate::system::System;
use crate::version::Version;

/// Timings are collected in milliseconds and charted in seconds.
pub const MILLIS_PER_SECOND: f64 = 1000.0;

/// Merged compile-time series for one repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoTimings {
    /// One point per version, ascending.
    pub points: Vec<ChartPoint>,
    /// Confidence bounds for every value in `points`, ordered by version then series.
    pub intervals: Vec<SeriesPoint>,
}

/// Output of [`merge_compile_times`].
#[derive(Debug, Default)]
pub struct MergedTimings {
    /// Repository name → merged series. Repositories no result file mentions
    /// are absent.
    pub repos: BTreeMap<String, RepoTimings>,
    /// Inputs that were skipped, with the reason.
    pub warnings: Vec<Warning>,
}

#[derive(Default)]
struct Bucket {
    samples: Vec<f64>,
    sources: usize,
}

/// Resolve each result file's system, skipping files with an unknown core count.
pub(crate) fn resolve_systems<'a>(
    results: &'a [ResultFile],
    warnings: &mut Vec<Warning>,
) -> Vec<(System, &'a BTreeMap<String, Profile>)> {
    let mut systems = Vec::with_capacity(results.len());
    for file in results {
        match file.system_info.system() {
            Ok(system) => {
                if systems.iter().any(|(seen, _)| *seen == system) {
                    tracing::debug!("Multiple result files for {}; pooling their samples", system);
                }
                systems.push((system, &file.profiles));
            }
            Err(e) => {
                tracing::warn!(
                    "Skipping result file from {} ({}): {}",
                    file.system_info.cpu_model,
                    file.system_info.num_cores,
                    e
                );
                warnings.push(Warning::new(e));
            }
        }
    }
    systems
}

/// Merge the compile-time buckets of `results` for every repository in `repo_names`.
#[instrument(level = "debug", skip_all, fields(repos = repo_names.len(), files = results.len()))]
pub fn merge_compile_times(repo_names: &[&str], results: &[ResultFile]) -> MergedTimings {
    let mut warnings = Vec::new();
    let systems = resolve_systems(results, &mut warnings);

    let merged: Vec<(&str, Option<RepoTimings>, Vec<Warning>)> = repo_names
        .par_iter()
        .map(|&repo| {
            let mut repo_warnings = Vec::new();
            let timings = merge_repo(repo, &systems, &mut repo_warnings);
            (repo, timings, repo_warnings)
        })
        .collect();

    let mut repos = BTreeMap::new();
    for (repo, timings, repo_warnings) in merged {
        warnings.extend(repo_warnings);
        if let Some(timings) = timings {
            repos.insert(repo.to_owned(), timings);
        }
    }

    MergedTimings { repos, warnings }
}

fn merge_repo(
    repo: &str,
    systems: &[(System, &BTreeMap<String, Profile>)],
    warnings: &mut Vec<Warning>,
) -> Option<RepoTimings> {
    let mut buckets: BTreeMap<(Version, SeriesKey), Bucket> = BTreeMap::new();
    let mut found = false;

    for &(system, profiles) in systems {
        let Some(profile) = profiles.get(repo) else {
            tracing::debug!("No profile for {} on {}", repo, system);
            continue;
        };
        found = true;

        for (raw_key, timings) in &profile.compile_times {
            let key = match decode_compile_key(raw_key) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!("Skipping bucket {:?} of {}: {}", raw_key, repo, e);
                    warnings.push(Warning::for_repo(repo, e));
                    continue;
                }
            };
            if timings.is_empty() {
                tracing::warn!("Skipping bucket {:?} of {} on {}: no samples", raw_key, repo, system);
                warnings.push(Warning::for_repo(
                    repo,
                    AggregateError::EmptyInput {
                        key: raw_key.clone(),
                        source: EmptyInputError,
                    },
                ));
                continue;
            }
            let series = key.series(system);
            let bucket = buckets.entry((key.version, series)).or_default();
            bucket.samples.extend_from_slice(timings);
            bucket.sources += 1;
        }
    }

    if !found {
        return None;
    }

    let mut points: BTreeMap<Version, ChartPoint> = BTreeMap::new();
    let mut intervals = Vec::with_capacity(buckets.len());

    for ((version, series), mut bucket) in buckets {
        if bucket.sources > 1 {
            bucket.samples.sort_by(f64::total_cmp);
        }
        let interval = match Interval::from_samples(&bucket.samples) {
            Ok(interval) => interval.map(|ms| ms / MILLIS_PER_SECOND),
            Err(source) => {
                warnings.push(Warning::for_repo(
                    repo,
                    AggregateError::EmptyInput {
                        key: format!("{version},{series}"),
                        source,
                    },
                ));
                continue;
            }
        };

        points
            .entry(version.clone())
            .or_insert_with(|| ChartPoint::new(version.clone()))
            .insert(series.to_string(), interval.mid);
        intervals.push(SeriesPoint {
            version,
            series,
            interval,
        });
    }

    Some(RepoTimings {
        points: points.into_values().collect(),
        intervals,
    })
}
