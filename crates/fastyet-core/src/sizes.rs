//! Binary-size series.
//!
//! Output size depends on the compiler version and build mode, not on the
//! machine, so sizes come from a single reference result file chosen by
//! [`choose_size_reference`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::ChartPoint;
use crate::error::Warning;
use crate::key::decode_size_key;
use crate::model::{Profile, ResultFile};
use crate::version::Version;

pub const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

/// Which result file supplies the size series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeReference {
    /// The first result file in the list.
    #[default]
    First,
    /// The first result file collected on a machine with this many cores.
    Cores(u32),
}

/// Pick the reference file for size extraction.
///
/// Files from an unknown system are never chosen. Returns `None` when no
/// file matches the policy.
pub fn choose_size_reference(results: &[ResultFile], policy: SizeReference) -> Option<&ResultFile> {
    let mut known = results.iter().filter(|r| r.system_info.system().is_ok());
    match policy {
        SizeReference::First => known.next(),
        SizeReference::Cores(cores) => known.find(|r| r.system_info.num_cores == cores),
    }
}

/// Format a byte count as megabytes with exactly three decimals.
///
/// Exact ties round up (`65536` bytes is `"0.063"`), matching the published
/// historical values.
pub fn format_megabytes(bytes: u64) -> String {
    // Thousandths of a megabyte, rounded half up in integer arithmetic.
    let divisor = u128::from(BYTES_PER_MEGABYTE);
    let thousandths = (u128::from(bytes) * 2000 + divisor) / (2 * divisor);
    format!("{}.{:03}", thousandths / 1000, thousandths % 1000)
}

/// Output of [`extract_sizes`].
#[derive(Debug, Default)]
pub struct ExtractedSizes {
    /// Repository name → one point per version (ascending) with `Debug` and/or
    /// `Release` fields. Repositories missing from the reference are absent.
    pub repos: BTreeMap<String, Vec<ChartPoint>>,
    /// Size keys that could not be decoded.
    pub warnings: Vec<Warning>,
}

/// Build size series for every repository in `repo_names` from one reference
/// file's profiles.
pub fn extract_sizes(repo_names: &[&str], reference: &BTreeMap<String, Profile>) -> ExtractedSizes {
    let mut extracted = ExtractedSizes::default();

    for &repo in repo_names {
        let Some(profile) = reference.get(repo) else {
            tracing::debug!("Reference result file has no profile for {}", repo);
            continue;
        };

        let mut points: BTreeMap<Version, ChartPoint> = BTreeMap::new();
        for (raw_key, &bytes) in &profile.output_sizes {
            let key = match decode_size_key(raw_key) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!("Skipping size {:?} of {}: {}", raw_key, repo, e);
                    extracted.warnings.push(Warning::for_repo(repo, e));
                    continue;
                }
            };
            if !key.compiler_mode.produces_binary() {
                continue;
            }
            points
                .entry(key.version.clone())
                .or_insert_with(|| ChartPoint::new(key.version.clone()))
                .insert(key.compiler_mode.as_str(), format_megabytes(bytes));
        }

        extracted.repos.insert(repo.to_owned(), points.into_values().collect());
    }

    extracted
}
