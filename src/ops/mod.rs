//! Top-Level Conda Operations
//!
//! The operations that are not scoped to a single environment: `info`,
//! `search`, and `launch`. Each one is a single `conda <subcommand> --json`
//! invocation; results are fresh snapshots, produced per call.

use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CondaError;
use crate::invoke::runner::call_json;

/// Snapshot of the conda installation, as reported by `conda info --json`.
///
/// Read-only; a new snapshot is produced on every [`info`] call.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Info {
    /// Configured package channels.
    pub channels: Vec<String>,

    /// Version of the conda tool itself.
    pub conda_version: String,

    /// Prefix new environments are created under by default.
    pub default_prefix: PathBuf,

    /// Paths of all known environments.
    pub envs: Vec<PathBuf>,

    /// Directories searched for environments.
    pub envs_dirs: Vec<PathBuf>,

    /// Whether this is a "foreign" (non-conda-managed) Python install.
    pub is_foreign: bool,

    /// Package cache directories.
    pub pkgs_dirs: Vec<PathBuf>,

    /// Platform string (e.g. "linux-64").
    pub platform: String,

    /// Version of the Python interpreter conda runs under.
    pub python_version: String,

    /// Path of the active .condarc file.
    pub rc_path: PathBuf,

    /// Root installation prefix.
    pub root_prefix: PathBuf,

    /// Whether the root prefix is writable by the current user.
    pub root_writable: bool,

    /// Any further keys newer conda versions report.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Success/error result shape for mutating operations.
///
/// Conda reports the outcome of installs, config writes, and launches as a
/// JSON object with a `success` flag on success or an `error` field on
/// tool-level failure. Both are preserved here verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Outcome {
    /// True when conda flagged the operation as successful.
    #[serde(default)]
    pub success: bool,

    /// Conda's own error message, when the operation failed tool-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Remaining fields of the result object (actions taken, dist lists, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Outcome {
    /// Whether conda reported a tool-level failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Queries the conda installation.
///
/// Runs `conda info --json` and returns the parsed snapshot.
pub async fn info() -> Result<Info, CondaError> {
    let value = call_json(["info"]).await?;
    debug!("conda info returned {} top-level keys", key_count(&value));
    Ok(serde_json::from_value(value)?)
}

/// Searches the configured channels for packages.
///
/// Runs `conda search --json [spec]`. The result maps package names to the
/// matching package records, exactly as conda reports them.
///
/// # Arguments
///
/// * `spec` - Optional package spec to match (e.g. "numpy", "python=3")
pub async fn search(spec: Option<&str>) -> Result<Map<String, Value>, CondaError> {
    let mut args = vec!["search"];
    if let Some(spec) = spec {
        args.push(spec);
    }

    let value = call_json(args).await?;
    match value {
        Value::Object(map) => Ok(map),
        other => Ok(single_error_map(other)),
    }
}

/// Launches an installed conda app.
///
/// Runs `conda launch <name> --json`. A nonexistent app, or a package that is
/// not launchable, resolves `Ok` with [`Outcome::error`] populated; only
/// wrapper-side faults are `Err`.
pub async fn launch(name: &str) -> Result<Outcome, CondaError> {
    let value = call_json(["launch", name]).await?;
    Ok(serde_json::from_value(value)?)
}

fn key_count(value: &Value) -> usize {
    value.as_object().map(|m| m.len()).unwrap_or(0)
}

// Non-object output under --json means the tool misbehaved; keep the
// in-band error convention rather than inventing a new failure channel.
fn single_error_map(value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        "error".to_string(),
        Value::String(format!("unexpected conda output: {}", value)),
    );
    map
}
