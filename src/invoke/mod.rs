//! Command Wrapper Module
//!
//! Everything between the library API and the external `conda` binary:
//! locating the executable and running it as a child process with
//! captured, parsed output.
//!
//! - [`binary`]: conda executable discovery
//! - [`runner`]: one-shot subprocess execution and JSON shaping

pub mod binary;
pub mod runner;

pub use binary::CONDA_PATH;
pub use runner::{call_json, call_text, run, RawOutput};
