//! Input documents: the repository catalog and per-machine result files.
//!
//! These types mirror the JSON written by the benchmark collector field for
//! field. Bucket keys are kept as raw strings here and decoded by the
//! aggregation stages, so one malformed key costs one bucket instead of the
//! whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::system::{System, UnknownSystemError};

/// One benchmarked project, as listed in `repos.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// Unique name, used as the join key into result profiles.
    pub name: String,
    pub sub_directory: String,
    pub url: String,
    pub touch_file: String,
    pub output: String,
    pub commit: String,
    /// Oldest compiler release the project builds with.
    pub min_version: String,
}

/// The machine a result file was collected on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub num_cores: u32,
    pub num_physical_cores: u32,
    pub cpu_model: String,
}

impl SystemInfo {
    pub fn system(&self) -> Result<System, UnknownSystemError> {
        System::from_cores(self.num_cores)
    }
}

/// All measurements for one repository on one machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// `"version,compilerMode,profileMode"` → timings in milliseconds.
    #[serde(default)]
    pub compile_times: BTreeMap<String, Vec<f64>>,
    /// `"version,compilerMode"` → output size in bytes.
    #[serde(default)]
    pub output_sizes: BTreeMap<String, u64>,
}

/// One collection run on one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    pub system_info: SystemInfo,
    /// Repository name → profile.
    pub profiles: BTreeMap<String, Profile>,
}
