//! Composite bucket keys.
//!
//! Result files address measurements with comma-joined strings:
//!
//! - compile-time buckets: `"{version},{compilerMode},{profileMode}"`
//! - size buckets: `"{version},{compilerMode}"`
//!
//! Charts name each line series `"{compilerMode},{profileMode},{system}"`.
//!
//! Inside the crate these are the typed records [`CompileKey`], [`SizeKey`]
//! and [`SeriesKey`]; the flat strings only exist at the JSON boundary. A
//! string with the wrong number of parts is a [`MalformedKeyError`], never a
//! silently truncated key.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::system::{CompilerMode, ProfileMode, System};
use crate::version::Version;

const SEPARATOR: char = ',';

/// A composite key that could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedKeyError {
    #[error("key {key:?} has {found} parts, expected {expected}")]
    WrongArity {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("key {key:?} has unknown compiler mode {mode:?}")]
    UnknownCompilerMode { key: String, mode: String },

    #[error("key {key:?} has unknown profile mode {mode:?}")]
    UnknownProfileMode { key: String, mode: String },

    #[error("key {key:?} has unknown system {label:?}")]
    UnknownSystemLabel { key: String, label: String },

    #[error("invalid version {version:?}")]
    InvalidVersion { version: String },
}

fn split_exact(key: &str, expected: usize) -> Result<Vec<&str>, MalformedKeyError> {
    let parts: Vec<&str> = key.split(SEPARATOR).collect();
    if parts.len() != expected {
        return Err(MalformedKeyError::WrongArity {
            key: key.to_owned(),
            expected,
            found: parts.len(),
        });
    }
    Ok(parts)
}

fn parse_compiler_mode(key: &str, mode: &str) -> Result<CompilerMode, MalformedKeyError> {
    mode.parse().map_err(|_| MalformedKeyError::UnknownCompilerMode {
        key: key.to_owned(),
        mode: mode.to_owned(),
    })
}

fn parse_profile_mode(key: &str, mode: &str) -> Result<ProfileMode, MalformedKeyError> {
    mode.parse().map_err(|_| MalformedKeyError::UnknownProfileMode {
        key: key.to_owned(),
        mode: mode.to_owned(),
    })
}

/// Address of one compile-time bucket inside a profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompileKey {
    pub version: Version,
    pub compiler_mode: CompilerMode,
    pub profile_mode: ProfileMode,
}

impl CompileKey {
    /// The chart series this bucket contributes to on `system`.
    pub fn series(&self, system: System) -> SeriesKey {
        SeriesKey {
            compiler_mode: self.compiler_mode,
            profile_mode: self.profile_mode,
            system,
        }
    }
}

impl FromStr for CompileKey {
    type Err = MalformedKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts = split_exact(key, 3)?;
        Ok(CompileKey {
            version: parts[0].parse()?,
            compiler_mode: parse_compiler_mode(key, parts[1])?,
            profile_mode: parse_profile_mode(key, parts[2])?,
        })
    }
}

impl fmt::Display for CompileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.version, self.compiler_mode, self.profile_mode)
    }
}

/// Address of one binary-size bucket inside a profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeKey {
    pub version: Version,
    pub compiler_mode: CompilerMode,
}

impl FromStr for SizeKey {
    type Err = MalformedKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts = split_exact(key, 2)?;
        Ok(SizeKey {
            version: parts[0].parse()?,
            compiler_mode: parse_compiler_mode(key, parts[1])?,
        })
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.version, self.compiler_mode)
    }
}

/// Name of one line series in a compile-time chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub compiler_mode: CompilerMode,
    pub profile_mode: ProfileMode,
    pub system: System,
}

impl FromStr for SeriesKey {
    type Err = MalformedKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts = split_exact(key, 3)?;
        let system = System::from_label(parts[2]).ok_or_else(|| MalformedKeyError::UnknownSystemLabel {
            key: key.to_owned(),
            label: parts[2].to_owned(),
        })?;
        Ok(SeriesKey {
            compiler_mode: parse_compiler_mode(key, parts[0])?,
            profile_mode: parse_profile_mode(key, parts[1])?,
            system,
        })
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.compiler_mode, self.profile_mode, self.system)
    }
}

impl Serialize for SeriesKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `"{version},{compilerMode}"`
pub fn encode_size_key(version: &Version, compiler_mode: CompilerMode) -> String {
    SizeKey {
        version: version.clone(),
        compiler_mode,
    }
    .to_string()
}

pub fn decode_size_key(raw: &str) -> Result<SizeKey, MalformedKeyError> {
    raw.parse()
}

/// `"{compilerMode},{profileMode},{system}"`
pub fn encode_series_key(compiler_mode: CompilerMode, profile_mode: ProfileMode, system: System) -> String {
    SeriesKey {
        compiler_mode,
        profile_mode,
        system,
    }
    .to_string()
}

pub fn decode_series_key(raw: &str) -> Result<SeriesKey, MalformedKeyError> {
    raw.parse()
}

pub fn decode_compile_key(raw: &str) -> Result<CompileKey, MalformedKeyError> {
    raw.parse()
}
