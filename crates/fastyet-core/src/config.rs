//! Aggregation settings.
//!
//! Settings are layered: [`AggregateConfig::default`], then an optional TOML
//! file, then whatever the caller overrides (command-line flags, environment).
//! Every key in the file is optional:
//!
//! ```toml
//! data_dir = "site/data"
//! catalog_file = "repos.json"
//! results_prefix = "results"
//! size_reference = { cores = 4 }   # or "first"
//! strict = true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::sizes::SizeReference;
use crate::source::{DEFAULT_CATALOG_FILE, DEFAULT_RESULTS_PREFIX, DirectorySource};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Directory holding the catalog and result files.
    pub data_dir: PathBuf,
    pub catalog_file: String,
    /// Result files are the files in `data_dir` whose name starts with this.
    pub results_prefix: String,
    pub size_reference: SizeReference,
    /// Fail when a cataloged repository has no data instead of warning.
    pub strict: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        AggregateConfig {
            data_dir: PathBuf::from("."),
            catalog_file: DEFAULT_CATALOG_FILE.to_owned(),
            results_prefix: DEFAULT_RESULTS_PREFIX.to_owned(),
            size_reference: SizeReference::First,
            strict: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    catalog_file: Option<String>,
    results_prefix: Option<String>,
    size_reference: Option<SizeReference>,
    strict: Option<bool>,
}

impl AggregateConfig {
    /// Defaults overlaid with the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = AggregateConfig::default();
        config.apply_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Overlay the keys present in `text` onto `self`.
    pub fn apply_toml(&mut self, text: &str) -> Result<(), toml::de::Error> {
        let file: ConfigFile = toml::from_str(text)?;
        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(catalog_file) = file.catalog_file {
            self.catalog_file = catalog_file;
        }
        if let Some(results_prefix) = file.results_prefix {
            self.results_prefix = results_prefix;
        }
        if let Some(size_reference) = file.size_reference {
            self.size_reference = size_reference;
        }
        if let Some(strict) = file.strict {
            self.strict = strict;
        }
        Ok(())
    }

    /// The directory source these settings describe.
    pub fn directory_source(&self) -> DirectorySource {
        DirectorySource::new(&self.data_dir)
            .with_catalog_file(&self.catalog_file)
            .with_results_prefix(&self.results_prefix)
    }
}
