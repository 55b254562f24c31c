//! Error types for record cleaning
//!
//! Every variant is scoped to a single input file, except `ProfileConfig`
//! which concerns the profile table itself.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while cleaning one input file
#[derive(Debug, Error)]
pub enum CleanError {
    /// Input path does not exist
    #[error("input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// Input exists but could not be read
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input is not a JSON array of objects
    #[error("invalid JSON in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No profile matches the file name and none was given explicitly
    #[error("unrecognized file type: {} (supported: {supported})", .path.display())]
    UnrecognizedProfile { path: PathBuf, supported: String },

    /// Cleaned output could not be written
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another input of the same batch already writes to this output
    #[error("{} would overwrite {}, already written for {}", .path.display(), .output.display(), .claimed_by.display())]
    OutputCollision {
        path: PathBuf,
        output: PathBuf,
        claimed_by: PathBuf,
    },

    /// Directory input holding no JSON files
    #[error("no JSON files found in {}", .path.display())]
    NoInputFiles { path: PathBuf },

    /// Profile file is missing or malformed
    #[error("invalid profile file {}: {reason}", .path.display())]
    ProfileConfig { path: PathBuf, reason: String },
}

impl CleanError {
    /// Short label used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "not found",
            Self::Read { .. } => "read error",
            Self::Parse { .. } => "parse error",
            Self::UnrecognizedProfile { .. } => "unrecognized profile",
            Self::Write { .. } => "write error",
            Self::OutputCollision { .. } => "output collision",
            Self::NoInputFiles { .. } => "no input files",
            Self::ProfileConfig { .. } => "profile config",
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanError>;
