//! Conda Executable Discovery
//!
//! # Resolution Priority
//!
//! The conda binary is resolved in the following order:
//! 1. `$CONDA_EXE`: set by conda's own shell integration
//! 2. System PATH: whatever `which conda` finds
//! 3. Well-known install prefixes: `~/miniconda3/bin/conda`, `~/anaconda3/bin/conda`
//! 4. The bare name `conda`, letting the eventual spawn report the failure

use std::path::PathBuf;
use std::process::Command;

use log::{info, warn};
use once_cell::sync::Lazy;

/// Lazily-initialized path to the conda binary.
pub static CONDA_PATH: Lazy<PathBuf> = Lazy::new(|| {
    // Priority 1: conda's activation scripts export CONDA_EXE
    if let Ok(exe) = std::env::var("CONDA_EXE") {
        if !exe.is_empty() {
            let path = PathBuf::from(exe);
            if path.exists() {
                info!("Using conda from CONDA_EXE: {}", path.display());
                return path;
            }
        }
    }

    // Priority 2: system PATH
    if let Ok(output) = Command::new("which").arg("conda").output() {
        if output.status.success() {
            let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path_str.is_empty() {
                let system_path = PathBuf::from(path_str);
                info!("Using system conda: {}", system_path.display());
                return system_path;
            }
        }
    }

    // Priority 3: default installer prefixes
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    for prefix in ["miniconda3", "anaconda3"] {
        let candidate = PathBuf::from(&home).join(prefix).join("bin").join("conda");
        if candidate.exists() {
            info!("Using conda from installer prefix: {}", candidate.display());
            return candidate;
        }
    }

    // Not found
    warn!("Conda binary not found");
    warn!("  Searched: CONDA_EXE");
    warn!("  Searched: system PATH");
    warn!("  Searched: ~/miniconda3, ~/anaconda3");
    warn!("  Install from: https://docs.conda.io/");

    PathBuf::from("conda")
});
