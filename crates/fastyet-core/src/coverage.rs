//! Incomplete-data report.
//!
//! A result set is complete when every `(compilerMode, profileMode)` bucket
//! measured for a version on one system was also measured on every other
//! system that profiled the repository. Gaps show up as missing lines on the
//! chart, so they are worth catching before publishing.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::key::{SeriesKey, decode_compile_key};
use crate::merge::resolve_systems;
use crate::model::{Repo, ResultFile};
use crate::system::{CompilerMode, ProfileMode, System};
use crate::version::Version;

/// A bucket measured on some systems but missing on `missing.system`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CoverageGap {
    pub repo: String,
    pub version: Version,
    /// The series that has no value at `version`.
    pub missing: SeriesKey,
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: no data for {}", self.repo, self.version, self.missing)
    }
}

type Modes = (CompilerMode, ProfileMode);

/// Find every coverage gap for the cataloged repositories, ordered by
/// repository, version and series.
///
/// Versions older than a repository's `min_version` are ignored. Buckets
/// with malformed keys or no samples count as missing. Result files from an
/// unknown system are ignored.
pub fn find_coverage_gaps(catalog: &[Repo], results: &[ResultFile]) -> Vec<CoverageGap> {
    let mut ignored = Vec::new();
    let systems = resolve_systems(results, &mut ignored);

    let mut gaps = Vec::new();
    for repo in catalog {
        let min_version = match repo.min_version.parse::<Version>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Not filtering {} by min_version: {}", repo.name, e);
                None
            }
        };

        let mut profiled_on: BTreeSet<System> = BTreeSet::new();
        let mut present: BTreeMap<Version, BTreeMap<Modes, BTreeSet<System>>> = BTreeMap::new();

        for &(system, profiles) in &systems {
            let Some(profile) = profiles.get(&repo.name) else {
                continue;
            };
            profiled_on.insert(system);
            for (raw_key, timings) in &profile.compile_times {
                if timings.is_empty() {
                    continue;
                }
                let Ok(key) = decode_compile_key(raw_key) else {
                    continue;
                };
                if min_version.as_ref().is_some_and(|min| key.version < *min) {
                    continue;
                }
                present
                    .entry(key.version)
                    .or_default()
                    .entry((key.compiler_mode, key.profile_mode))
                    .or_default()
                    .insert(system);
            }
        }

        for (version, modes) in present {
            for ((compiler_mode, profile_mode), measured) in modes {
                for &system in profiled_on.difference(&measured) {
                    gaps.push(CoverageGap {
                        repo: repo.name.clone(),
                        version: version.clone(),
                        missing: SeriesKey {
                            compiler_mode,
                            profile_mode,
                            system,
                        },
                    });
                }
            }
        }
    }

    tracing::debug!("Found {} coverage gaps", gaps.len());
    gaps
}
