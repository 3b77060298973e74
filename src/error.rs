//! Crate Error Type
//!
//! Distinguishes wrapper-side faults (which become `Err`) from tool-level
//! failures, which conda reports through its own JSON output and which the
//! operations resolve successfully with an `error` field preserved.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the conda client itself.
///
/// Failures that the conda tool reports in-band (a nonexistent app, an
/// unsolvable package spec) are *not* represented here; those come back as
/// values carrying an `error` field. See [`crate::ops::Outcome`].
#[derive(Debug, Error)]
pub enum CondaError {
    /// The conda executable could not be spawned.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tool produced output that is not valid UTF-8.
    #[error("output from conda is not valid UTF-8")]
    Output(#[from] std::string::FromUtf8Error),

    /// The tool exited successfully but its output was not the JSON we asked for.
    #[error("failed to parse conda JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration key outside the allow-list was used.
    #[error("'{key}' is not a recognized configuration key")]
    InvalidKey { key: String },

    /// Both a system-wide and a per-file configuration target were requested.
    #[error("configuration target cannot be both system-wide and a specific file")]
    ConflictingTarget,

    /// The tool failed without producing a parseable result.
    #[error("conda failed: {message}")]
    Failed { message: String },
}
