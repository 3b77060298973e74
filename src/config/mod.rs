//! Configuration Access
//!
//! Wraps `conda config`, restricted to the enumerated keys conda documents
//! for .condarc. Key validation and target validation happen before any
//! process is spawned; only the delegation itself is asynchronous.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::error::CondaError;
use crate::invoke::runner::call_json;
use crate::ops::Outcome;

/// Configuration keys conda accepts in .condarc.
pub const ALLOWED_KEYS: &[&str] = &[
    "allow_other_channels",
    "allow_softlinks",
    "always_yes",
    "binstar_personal",
    "binstar_upload",
    "changeps1",
    "channels",
    "create_default_packages",
    "disallow",
    "envs_dirs",
    "show_channel_urls",
    "ssl_verify",
    "track_features",
    "use_pip",
];

/// Which .condarc a [`Config`] reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// The user's default .condarc.
    Default,
    /// The system-wide configuration (`--system`).
    System,
    /// A specific file (`--file <path>`).
    File(PathBuf),
}

/// Options for constructing a [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Target the system-wide configuration.
    pub system: bool,
    /// Target a specific .condarc file.
    pub file: Option<PathBuf>,
}

/// Handle on one conda configuration target.
#[derive(Debug, Clone)]
pub struct Config {
    target: Target,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a handle on the user's default configuration.
    pub fn new() -> Self {
        Self {
            target: Target::Default,
        }
    }

    /// Creates a handle on the system-wide configuration.
    pub fn system() -> Self {
        Self {
            target: Target::System,
        }
    }

    /// Creates a handle on a specific .condarc file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::File(path.into()),
        }
    }

    /// Creates a handle from option flags.
    ///
    /// The system-wide and per-file targets are mutually exclusive;
    /// requesting both is a caller mistake and fails immediately.
    pub fn with_options(options: ConfigOptions) -> Result<Self, CondaError> {
        match (options.system, options.file) {
            (true, Some(_)) => Err(CondaError::ConflictingTarget),
            (true, None) => Ok(Self::system()),
            (false, Some(path)) => Ok(Self::file(path)),
            (false, None) => Ok(Self::new()),
        }
    }

    /// Arguments selecting this target on the conda command line.
    fn target_args(&self) -> Vec<String> {
        match &self.target {
            Target::Default => Vec::new(),
            Target::System => vec!["--system".to_string()],
            Target::File(path) => {
                vec!["--file".to_string(), path.display().to_string()]
            }
        }
    }

    /// Reads one configuration key.
    ///
    /// Runs `conda config --get <key> --json`. An unknown key fails
    /// immediately, before any process is spawned.
    pub async fn get(&self, key: &str) -> Result<Value, CondaError> {
        validate_key(key)?;
        debug!("conda config --get {}", key);

        let mut args = vec!["config".to_string(), "--get".to_string(), key.to_string()];
        args.extend(self.target_args());
        call_json(args).await
    }

    /// Reads every configured key at once.
    ///
    /// Runs `conda config --get --json`.
    pub async fn get_all(&self) -> Result<Value, CondaError> {
        let mut args = vec!["config".to_string(), "--get".to_string()];
        args.extend(self.target_args());
        call_json(args).await
    }

    /// Writes one boolean-or-scalar configuration key.
    ///
    /// Runs `conda config --set <key> <value> --json` and resolves to conda's
    /// success-flagged result object.
    pub async fn set(&self, key: &str, value: impl Into<ConfigValue>) -> Result<Outcome, CondaError> {
        self.mutate("--set", key, value.into()).await
    }

    /// Prepends a value to a list-valued configuration key.
    ///
    /// Runs `conda config --add <key> <value> --json`.
    pub async fn add(&self, key: &str, value: impl Into<ConfigValue>) -> Result<Outcome, CondaError> {
        self.mutate("--add", key, value.into()).await
    }

    /// Removes a value from a list-valued configuration key.
    ///
    /// Runs `conda config --remove <key> <value> --json`.
    pub async fn remove(
        &self,
        key: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<Outcome, CondaError> {
        self.mutate("--remove", key, value.into()).await
    }

    async fn mutate(
        &self,
        flag: &str,
        key: &str,
        value: ConfigValue,
    ) -> Result<Outcome, CondaError> {
        validate_key(key)?;
        debug!("conda config {} {} {}", flag, key, value);

        let mut args = vec![
            "config".to_string(),
            flag.to_string(),
            key.to_string(),
            value.to_string(),
        ];
        args.extend(self.target_args());

        let result = call_json(args).await?;
        Ok(serde_json::from_value(result)?)
    }
}

/// A value acceptable on the `conda config` command line.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<&Path> for ConfigValue {
    fn from(value: &Path) -> Self {
        ConfigValue::Text(value.display().to_string())
    }
}

/// Checks a key against the allow-list.
pub fn is_allowed_key(key: &str) -> bool {
    ALLOWED_KEYS.contains(&key)
}

fn validate_key(key: &str) -> Result<(), CondaError> {
    if is_allowed_key(key) {
        Ok(())
    } else {
        Err(CondaError::InvalidKey {
            key: key.to_string(),
        })
    }
}
