//! Environment Management
//!
//! Conda owns all environment state; an [`Env`] is only a name and prefix
//! used to scope further invocations. Nothing is cached: every operation
//! re-asks the tool.
//!
//! - [`package`]: installed package and revision history records

pub mod package;

pub use package::{Package, Revision};

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CondaError;
use crate::invoke::runner::call_json;
use crate::ops::{self, Outcome};

/// Name of the root environment.
const ROOT_ENV_NAME: &str = "root";

/// A named conda environment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Env {
    /// Environment name (final path component of the prefix; the root
    /// prefix is named "root").
    pub name: String,

    /// Installation prefix of the environment.
    pub prefix: PathBuf,
}

impl Env {
    /// Creates a handle on an environment conda already knows about.
    pub fn new(name: impl Into<String>, prefix: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
        }
    }

    /// Lists all environments known to the installation.
    ///
    /// Derived from `conda info --json`: the root environment first, then
    /// one entry per environment prefix. Never empty, since the root
    /// environment always exists.
    pub async fn get_envs() -> Result<Vec<Env>, CondaError> {
        let info = ops::info().await?;
        let envs = envs_from_prefixes(&info.root_prefix, &info.envs);
        debug!("Found {} environments", envs.len());
        Ok(envs)
    }

    /// Creates a new environment with the given packages.
    ///
    /// Runs `conda create --yes -n <name> <pkgs...> --json`; resolves to
    /// conda's success-flagged result object.
    pub async fn create(name: &str, packages: &[String]) -> Result<Outcome, CondaError> {
        info!("Creating environment '{}' with packages: {:?}", name, packages);

        let mut args = vec![
            "create".to_string(),
            "--yes".to_string(),
            "-n".to_string(),
            name.to_string(),
        ];
        args.extend(packages.iter().cloned());

        let value = call_json(args).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Installs packages into this environment.
    ///
    /// Runs `conda install --yes -n <name> <pkgs...> --json`; resolves to
    /// conda's success-flagged result object.
    pub async fn install(&self, packages: &[String]) -> Result<Outcome, CondaError> {
        info!(
            "Installing into '{}': {:?}",
            self.name, packages
        );

        let mut args = vec![
            "install".to_string(),
            "--yes".to_string(),
            "-n".to_string(),
            self.name.clone(),
        ];
        args.extend(packages.iter().cloned());

        let value = call_json(args).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Lists the packages linked into this environment.
    ///
    /// Runs `conda list -n <name> --json` and parses each entry into a
    /// [`Package`]. Entries that do not parse are skipped.
    pub async fn linked(&self) -> Result<Vec<Package>, CondaError> {
        let entries = self.linked_entries().await?;
        Ok(entries
            .iter()
            .filter_map(Package::from_list_entry)
            .collect())
    }

    /// Lists the linked packages as plain dist strings.
    pub async fn linked_simple(&self) -> Result<Vec<String>, CondaError> {
        let entries = self.linked_entries().await?;
        Ok(entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(dist) => Some(dist.clone()),
                Value::Object(_) => Package::from_list_entry(entry).map(|pkg| pkg.dist()),
                _ => None,
            })
            .collect())
    }

    /// Fetches this environment's revision history.
    ///
    /// Runs `conda list -n <name> --revisions --json`. Every install and
    /// removal creates a revision, so the history is never empty.
    pub async fn revisions(&self) -> Result<Vec<Revision>, CondaError> {
        let value = call_json(["list", "-n", self.name.as_str(), "--revisions"]).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Removes this environment entirely.
    ///
    /// Runs `conda remove --yes --all -n <name> --json`.
    pub async fn remove(self) -> Result<Outcome, CondaError> {
        info!("Removing environment '{}'", self.name);

        let value = call_json(["remove", "--yes", "--all", "-n", self.name.as_str()]).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Whether this handle refers to the root environment.
    pub fn is_root(&self) -> bool {
        self.name == ROOT_ENV_NAME
    }

    async fn linked_entries(&self) -> Result<Vec<Value>, CondaError> {
        let value = call_json(["list", "-n", self.name.as_str()]).await?;
        match value {
            Value::Array(entries) => Ok(entries),
            other => Err(CondaError::Failed {
                message: format!("expected a package list, got: {}", other),
            }),
        }
    }
}

/// Builds the environment list the way conda presents it: root first,
/// then the named environments, skipping a duplicate root prefix entry.
fn envs_from_prefixes(root_prefix: &Path, prefixes: &[PathBuf]) -> Vec<Env> {
    let mut envs = vec![Env::new(ROOT_ENV_NAME, root_prefix)];

    for prefix in prefixes {
        if prefix == root_prefix {
            continue;
        }
        let name = prefix
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| prefix.display().to_string());
        envs.push(Env::new(name, prefix));
    }

    envs
}
