//! Subprocess Execution and Output Shaping
//!
//! One-shot delegation to the external binary: spawn, capture stdout and
//! stderr, parse. No retry, no timeout, no pooling; the child process is the
//! only resource and its lifetime is the call's lifetime.
//!
//! Conda reports its own failures as `{"error": ...}` JSON on stdout when
//! invoked with `--json`. [`call_json`] preserves that: a tool-level failure
//! comes back as a successfully-parsed value carrying an `error` key, while
//! wrapper-side faults (spawn failure, non-UTF-8 output) are `Err`.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use log::{debug, warn};
use serde_json::{json, Value};

use crate::error::CondaError;
use crate::invoke::binary::CONDA_PATH;

/// Captured result of one subprocess execution.
#[derive(Debug, Clone)]
pub struct RawOutput {
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// The exit code, if available.
    pub exit_code: Option<i32>,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
}

impl RawOutput {
    fn from_output(output: std::process::Output) -> Result<Self, CondaError> {
        Ok(Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8(output.stdout)?,
            stderr: String::from_utf8(output.stderr)?,
        })
    }
}

/// Runs a program to completion, capturing its output.
///
/// # Arguments
///
/// * `program` - Path of the executable to run
/// * `args` - Arguments to pass, exec'd directly with no shell interpretation
pub async fn run<I, S>(program: &Path, args: I) -> Result<RawOutput, CondaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<std::ffi::OsString> = args
        .into_iter()
        .map(|a| a.as_ref().to_os_string())
        .collect();

    debug!("Executing: {} {:?}", program.display(), args);

    let output = tokio::process::Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| CondaError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

    let raw = RawOutput::from_output(output)?;
    debug!(
        "Completed: {} (exit code {:?})",
        program.display(),
        raw.exit_code
    );
    Ok(raw)
}

/// Runs the conda binary with `--json` appended and parses stdout.
///
/// Tool-level failures are preserved: if conda exits non-zero but still emits
/// JSON, that JSON is returned as the result. If it exits non-zero without
/// JSON, an `{"error": ...}` value is synthesized from stderr so callers
/// always see the failure in-band.
pub async fn call_json<I, S>(args: I) -> Result<Value, CondaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut full_args: Vec<std::ffi::OsString> = args
        .into_iter()
        .map(|a| a.as_ref().to_os_string())
        .collect();
    full_args.push("--json".into());

    let raw = run(CONDA_PATH.as_path(), full_args).await?;
    shape_json(raw)
}

/// Runs the conda binary and passes stdout through verbatim.
///
/// For subcommands that emit plain text. A non-zero exit becomes an `Err`
/// here since there is no JSON error channel to preserve.
pub async fn call_text<I, S>(args: I) -> Result<String, CondaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let raw = run(CONDA_PATH.as_path(), args).await?;

    if raw.success {
        Ok(raw.stdout)
    } else {
        Err(CondaError::Failed {
            message: failure_message(&raw),
        })
    }
}

/// Interprets captured output as the JSON result of a `--json` invocation.
fn shape_json(raw: RawOutput) -> Result<Value, CondaError> {
    match serde_json::from_str::<Value>(&raw.stdout) {
        Ok(value) => Ok(value),
        Err(parse_err) => {
            if raw.success {
                // Zero exit but unparseable output is a wrapper-side fault.
                return Err(parse_err.into());
            }
            // Older condas print plain text for some failures even under
            // --json. Surface those in-band like the tool's own error JSON.
            warn!("conda failed without JSON output, synthesizing error value");
            Ok(json!({ "error": failure_message(&raw) }))
        }
    }
}

fn failure_message(raw: &RawOutput) -> String {
    let stderr = raw.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = raw.stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    format!("conda exited with code {:?}", raw.exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(success: bool, exit_code: Option<i32>, stdout: &str, stderr: &str) -> RawOutput {
        RawOutput {
            success,
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_shape_json_parses_success() {
        let value = shape_json(raw(true, Some(0), r#"{"channels": []}"#, "")).unwrap();
        assert!(value.get("channels").is_some());
    }

    #[test]
    fn test_shape_json_preserves_tool_error_json() {
        let value = shape_json(raw(
            false,
            Some(1),
            r#"{"error": "app 'nonexistent' not found"}"#,
            "",
        ))
        .unwrap();
        assert_eq!(
            value["error"].as_str().unwrap(),
            "app 'nonexistent' not found"
        );
    }

    #[test]
    fn test_shape_json_synthesizes_error_from_stderr() {
        let value = shape_json(raw(false, Some(1), "", "CondaError: no such command")).unwrap();
        assert_eq!(value["error"].as_str().unwrap(), "CondaError: no such command");
    }

    #[test]
    fn test_shape_json_synthesizes_error_from_stdout() {
        let value = shape_json(raw(false, Some(2), "usage: conda [-h]", "")).unwrap();
        assert!(value["error"].as_str().unwrap().contains("usage"));
    }

    #[test]
    fn test_shape_json_rejects_garbage_on_success() {
        let result = shape_json(raw(true, Some(0), "not json at all", ""));
        assert!(matches!(result, Err(CondaError::Json(_))));
    }

    #[test]
    fn test_failure_message_prefers_stderr() {
        let msg = failure_message(&raw(false, Some(1), "out", "err"));
        assert_eq!(msg, "err");
    }

    #[test]
    fn test_failure_message_falls_back_to_exit_code() {
        let msg = failure_message(&raw(false, Some(127), "", ""));
        assert!(msg.contains("127"));
    }

    #[tokio::test]
    async fn test_run_echo() {
        let result = run(Path::new("echo"), ["hello", "world"]).await.unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout.trim(), "hello world");
    }

    #[tokio::test]
    async fn test_run_false_command() {
        let result = run(Path::new("false"), Vec::<&str>::new()).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(1));
    }

    #[tokio::test]
    async fn test_run_captures_stderr() {
        let result = run(Path::new("sh"), ["-c", "echo error >&2"]).await.unwrap();
        assert!(result.success);
        assert_eq!(result.stderr.trim(), "error");
    }

    #[tokio::test]
    async fn test_run_nonexistent_program() {
        let result = run(Path::new("nonexistent_program_12345"), Vec::<&str>::new()).await;
        assert!(matches!(result, Err(CondaError::Spawn { .. })));
    }
}
