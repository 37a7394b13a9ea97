//! Aggregation of compiler benchmark results into chart-ready series.
//!
//! Benchmark machines each write one result file with compile timings and
//! binary sizes per repository, compiler version and build mode. This crate
//! merges those files into one series per repository, with a 95% confidence
//! interval per timing bucket, and derives version-over-version deltas.
//!
//! ```no_run
//! use fastyet_core::{AggregateConfig, assemble_from};
//!
//! let config = AggregateConfig::default();
//! let assembly = assemble_from(&config.directory_source(), &config)?;
//! for chart in &assembly.charts {
//!     println!("{}: {} versions", chart.repo.name, chart.compile_times.len());
//! }
//! # Ok::<(), fastyet_core::AggregateError>(())
//! ```

pub mod assemble;
pub mod chart;
pub mod config;
pub mod coverage;
pub mod delta;
pub mod error;
pub mod key;
pub mod merge;
pub mod model;
pub mod sizes;
pub mod source;
pub mod stats;
pub mod system;
pub mod version;

pub use assemble::{Assembly, assemble, assemble_from};
pub use chart::{ChartData, ChartPoint, FieldValue, SeriesPoint};
pub use config::{AggregateConfig, ConfigError};
pub use coverage::{CoverageGap, find_coverage_gaps};
pub use error::{AggregateError, DataSection, Warning};
pub use model::{Profile, Repo, ResultFile, SystemInfo};
pub use sizes::SizeReference;
pub use source::{DirectorySource, DocumentSource, InMemorySource, SourceError};
pub use system::{CompilerMode, ProfileMode, System};
pub use version::Version;
