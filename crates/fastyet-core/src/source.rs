//! Where catalog and result documents come from.
//!
//! The pipeline only needs "a catalog and some result files". [`DirectorySource`]
//! reads them from a data directory laid out the way the collector writes it:
//!
//! ```text
//! data/
//! ├── repos.json
//! ├── results-2-1a2b3c.json
//! └── results-8-4d5e6f.json
//! ```
//!
//! [`InMemorySource`] serves already-parsed documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{Repo, ResultFile};

pub const DEFAULT_CATALOG_FILE: &str = "repos.json";
pub const DEFAULT_RESULTS_PREFIX: &str = "results";

/// Failure to obtain the input documents. Always fatal to the assembly.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading a file or listing the data directory failed
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A document is not valid JSON for its type
    #[error("Failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The catalog file does not exist
    #[error("Repository catalog {} not found", path.display())]
    MissingCatalog { path: PathBuf },
}

/// A provider of the repository catalog and the result documents.
pub trait DocumentSource {
    fn catalog(&self) -> Result<Vec<Repo>, SourceError>;

    /// Every result document. Implementations return them in a stable order.
    fn results(&self) -> Result<Vec<ResultFile>, SourceError>;
}

/// Documents stored as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    catalog_file: String,
    results_prefix: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySource {
            dir: dir.into(),
            catalog_file: DEFAULT_CATALOG_FILE.to_owned(),
            results_prefix: DEFAULT_RESULTS_PREFIX.to_owned(),
        }
    }

    #[must_use]
    pub fn with_catalog_file(mut self, name: impl Into<String>) -> Self {
        self.catalog_file = name.into();
        self
    }

    #[must_use]
    pub fn with_results_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.results_prefix = prefix.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the result documents, sorted by file name.
    ///
    /// Directory listing order is platform dependent; sorting makes the
    /// first file (the default size reference) stable.
    pub fn result_paths(&self) -> Result<Vec<PathBuf>, SourceError> {
        let io_err = |source| SourceError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
                continue;
            };
            if !name.starts_with(&self.results_prefix) {
                continue;
            }
            if !entry.file_type().map_err(io_err)?.is_file() {
                continue;
            }
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl DocumentSource for DirectorySource {
    fn catalog(&self) -> Result<Vec<Repo>, SourceError> {
        let path = self.dir.join(&self.catalog_file);
        if !path.is_file() {
            return Err(SourceError::MissingCatalog { path });
        }
        let repos: Vec<Repo> = read_json(&path)?;
        tracing::debug!("Loaded {} repositories from {}", repos.len(), path.display());
        Ok(repos)
    }

    fn results(&self) -> Result<Vec<ResultFile>, SourceError> {
        let paths = self.result_paths()?;
        let mut results = Vec::with_capacity(paths.len());
        for path in &paths {
            let file: ResultFile = read_json(path)?;
            tracing::debug!(
                "Loaded {} ({} cores, {} profiles)",
                path.display(),
                file.system_info.num_cores,
                file.profiles.len()
            );
            results.push(file);
        }
        Ok(results)
    }
}

/// Documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub catalog: Vec<Repo>,
    pub results: Vec<ResultFile>,
}

impl InMemorySource {
    pub fn new(catalog: Vec<Repo>, results: Vec<ResultFile>) -> Self {
        InMemorySource { catalog, results }
    }
}

impl DocumentSource for InMemorySource {
    fn catalog(&self) -> Result<Vec<Repo>, SourceError> {
        Ok(self.catalog.clone())
    }

    fn results(&self) -> Result<Vec<ResultFile>, SourceError> {
        Ok(self.results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RESULT: &str = r#"{
        "system_info": { "num_cores": 4, "num_physical_cores": 2, "cpu_model": "test" },
        "profiles": {}
    }"#;

    #[test]
    fn test_missing_catalog() {
        let dir = TempDir::new().unwrap();
        let err = DirectorySource::new(dir.path()).catalog().unwrap_err();
        assert!(matches!(err, SourceError::MissingCatalog { .. }));
        assert!(err.to_string().contains("repos.json"));
    }

    #[test]
    fn test_result_paths_filtered_and_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["results-8-b.json", "repos.json", "results-2-a.json", "notes.txt"] {
            fs::write(dir.path().join(name), RESULT).unwrap();
        }
        fs::create_dir(dir.path().join("results-dir")).unwrap();

        let source = DirectorySource::new(dir.path());
        let names: Vec<_> = source
            .result_paths()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["results-2-a.json", "results-8-b.json"]);
        assert_eq!(source.results().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("results-bad.json"), "{ not json").unwrap();
        let err = DirectorySource::new(dir.path()).results().unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
        assert!(err.to_string().contains("results-bad.json"));
    }

    #[test]
    fn test_custom_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("catalog.json"), "[]").unwrap();
        fs::write(dir.path().join("run-1.json"), RESULT).unwrap();
        fs::write(dir.path().join("results-1.json"), RESULT).unwrap();
        let source = DirectorySource::new(dir.path())
            .with_catalog_file("catalog.json")
            .with_results_prefix("run-");
        assert!(source.catalog().unwrap().is_empty());
        assert_eq!(source.results().unwrap().len(), 1);
    }
}
