//! Hardware classes and build dimensions.
//!
//! The benchmark matrix has three closed dimensions: the [`System`] a result
//! file was collected on, the [`CompilerMode`] of the build and the
//! [`ProfileMode`] describing the state of the build cache. Adding a new
//! machine class or build mode means adding a variant here and to the
//! matching `as_str`/`FromStr` arms; every `match` in the crate is exhaustive,
//! so the compiler points at each place that needs a decision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A labeled hardware class, defined by its logical core count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum System {
    TwoCores,
    FourCores,
    EightCores,
    SixteenCores,
}

/// A result file reported a core count that has no [`System`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no system is defined for {cores} cores (known: 2, 4, 8, 16)")]
pub struct UnknownSystemError {
    pub cores: u32,
}

impl System {
    /// All systems, smallest first.
    pub const ALL: [System; 4] = [
        System::TwoCores,
        System::FourCores,
        System::EightCores,
        System::SixteenCores,
    ];

    /// Map a logical core count to its system.
    pub fn from_cores(cores: u32) -> Result<Self, UnknownSystemError> {
        match cores {
            2 => Ok(System::TwoCores),
            4 => Ok(System::FourCores),
            8 => Ok(System::EightCores),
            16 => Ok(System::SixteenCores),
            _ => Err(UnknownSystemError { cores }),
        }
    }

    pub fn cores(self) -> u32 {
        match self {
            System::TwoCores => 2,
            System::FourCores => 4,
            System::EightCores => 8,
            System::SixteenCores => 16,
        }
    }

    /// Chart label, e.g. `"4 cores"`.
    pub fn label(self) -> &'static str {
        match self {
            System::TwoCores => "2 cores",
            System::FourCores => "4 cores",
            System::EightCores => "8 cores",
            System::SixteenCores => "16 cores",
        }
    }

    /// Inverse of [`System::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        System::ALL.into_iter().find(|system| system.label() == label)
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A build invocation variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompilerMode {
    Check,
    Debug,
    Release,
}

impl CompilerMode {
    pub const ALL: [CompilerMode; 3] = [CompilerMode::Check, CompilerMode::Debug, CompilerMode::Release];

    pub fn as_str(self) -> &'static str {
        match self {
            CompilerMode::Check => "Check",
            CompilerMode::Debug => "Debug",
            CompilerMode::Release => "Release",
        }
    }

    /// Whether this mode produces a binary whose size is charted.
    pub fn produces_binary(self) -> bool {
        match self {
            CompilerMode::Check => false,
            CompilerMode::Debug | CompilerMode::Release => true,
        }
    }
}

impl fmt::Display for CompilerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode: {}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for CompilerMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Check" => Ok(CompilerMode::Check),
            "Debug" => Ok(CompilerMode::Debug),
            "Release" => Ok(CompilerMode::Release),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

/// Whether a build starts from a cold or warm cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfileMode {
    /// Target directory removed before the build.
    Clean,
    /// Source file touched, nothing else changed.
    Incremental,
    /// Source file edited (a statement added) before rebuilding.
    PatchIncremental,
}

impl ProfileMode {
    pub const ALL: [ProfileMode; 3] = [
        ProfileMode::Clean,
        ProfileMode::Incremental,
        ProfileMode::PatchIncremental,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileMode::Clean => "Clean",
            ProfileMode::Incremental => "Incremental",
            ProfileMode::PatchIncremental => "PatchIncremental",
        }
    }
}

impl fmt::Display for ProfileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Clean" => Ok(ProfileMode::Clean),
            "Incremental" => Ok(ProfileMode::Incremental),
            "PatchIncremental" => Ok(ProfileMode::PatchIncremental),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}
