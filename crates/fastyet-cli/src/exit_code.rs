//! Process exit codes.
//!
//! clap exits with 2 on usage errors, so 2 is not reused here.

pub const SUCCESS: u8 = 0;
pub const GENERAL_ERROR: u8 = 1;
/// `check` found warnings or coverage gaps.
pub const ISSUES_FOUND: u8 = 3;
/// A catalog or result document is malformed, or a repository has no data.
pub const DATA_ERROR: u8 = 65;
/// The data directory, catalog or config file does not exist.
pub const NOT_FOUND: u8 = 66;
/// The config file is invalid.
pub const CONFIG_ERROR: u8 = 78;
