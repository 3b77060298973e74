//! conda-client - Async Client for the Conda CLI
//!
//! A thin, typed binding over the external `conda` package-management tool.
//! Every operation builds a command line, spawns `conda` as a child process,
//! parses its JSON output, and resolves asynchronously. Conda itself owns all
//! state; this crate contributes discovery, invocation, and result shaping.
//!
//! # Architecture
//!
//! The library is organized into four main modules:
//!
//! - [`invoke`]: conda binary discovery and subprocess execution
//! - [`ops`]: top-level operations (`info`, `search`, `launch`)
//! - [`config`]: .condarc access restricted to conda's documented keys
//! - [`env`]: environment-scoped operations and package records
//!
//! # Example
//!
//! ```rust,no_run
//! use conda_client::{info, Env};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), conda_client::CondaError> {
//!     let info = info().await?;
//!     println!("conda {} on {}", info.conda_version, info.platform);
//!
//!     for env in Env::get_envs().await? {
//!         let packages = env.linked().await?;
//!         println!("{}: {} packages", env.name, packages.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Failure Channels
//!
//! Caller mistakes (unknown config key, conflicting config target) and
//! wrapper-side faults (spawn failure, malformed output) are `Err`. Failures
//! conda reports in its own JSON, such as launching a nonexistent app,
//! resolve `Ok` with the `error` field preserved; see [`ops::Outcome`].

pub mod config;
pub mod env;
pub mod error;
pub mod invoke;
pub mod ops;

// Re-export commonly used types
pub use config::{Config, ConfigOptions};
pub use env::{Env, Package, Revision};
pub use error::CondaError;
pub use ops::{info, launch, search, Info, Outcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "conda-client";
