//! Error types for the aggregation pipeline.
//!
//! Each stage declares its own error next to the code that raises it; this
//! module re-exports them and defines the crate-level [`AggregateError`].
//!
//! Errors fall into two groups:
//!
//! - per-bucket / per-file problems ([`MalformedKeyError`],
//!   [`UnknownSystemError`], [`EmptyInputError`]) are isolated: the offending
//!   bucket or file is skipped and reported as a [`Warning`];
//! - cross-cutting problems ([`SourceError`], missing repository data) abort
//!   the assembly.

use std::fmt;

use thiserror::Error;

pub use crate::key::MalformedKeyError;
pub use crate::source::SourceError;
pub use crate::stats::EmptyInputError;
pub use crate::system::UnknownSystemError;

/// Any failure the aggregation pipeline can report.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("malformed key: {0}")]
    MalformedKey(#[from] MalformedKeyError),

    #[error(transparent)]
    UnknownSystem(#[from] UnknownSystemError),

    #[error("bucket {key:?} has no samples")]
    EmptyInput {
        key: String,
        #[source]
        source: EmptyInputError,
    },

    #[error("repository {repo:?} is in the catalog but has no {section} data")]
    MissingRepoData { repo: String, section: DataSection },

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Which half of the chart payload a problem concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSection {
    CompileTimes,
    Sizes,
}

impl fmt::Display for DataSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSection::CompileTimes => f.write_str("compile time"),
            DataSection::Sizes => f.write_str("size"),
        }
    }
}

/// A non-fatal problem: some input was skipped, the rest was aggregated.
#[derive(Debug)]
pub struct Warning {
    /// Repository the skipped input belonged to, when known.
    pub repo: Option<String>,
    /// Why the input was skipped.
    pub error: AggregateError,
}

impl Warning {
    pub fn new(error: impl Into<AggregateError>) -> Self {
        Warning {
            repo: None,
            error: error.into(),
        }
    }

    pub fn for_repo(repo: impl Into<String>, error: impl Into<AggregateError>) -> Self {
        Warning {
            repo: Some(repo.into()),
            error: error.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repo {
            Some(repo) => write!(f, "{repo}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}
