//! Integration tests for the subprocess runner, plus end-to-end tests
//! against a live conda installation.
//!
//! The runner tests use plain system binaries and always run. The
//! end-to-end tests mirror the operations the library wraps and are
//! `#[ignore]`d; run them on a machine with conda installed:
//!
//! ```bash
//! cargo test -- --ignored
//! ```

use std::path::Path;

use conda_client::invoke::runner::run;
use conda_client::{Config, ConfigOptions, Env};

#[tokio::test]
async fn runner_captures_stdout() {
    let result = run(Path::new("sh"), ["-c", "printf 'one two'"]).await.unwrap();
    assert!(result.success);
    assert_eq!(result.stdout, "one two");
    assert!(result.stderr.is_empty());
}

#[tokio::test]
async fn runner_reports_exit_code() {
    let result = run(Path::new("sh"), ["-c", "exit 3"]).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.exit_code, Some(3));
}

#[tokio::test]
async fn runner_output_parses_as_json() {
    let result = run(
        Path::new("sh"),
        ["-c", r#"echo '{"success": true, "count": 2}'"#],
    )
    .await
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(value["success"], serde_json::json!(true));
    assert_eq!(value["count"], serde_json::json!(2));
}

#[tokio::test]
async fn runner_executes_script_from_disk() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("emit.sh");
    let mut file = std::fs::File::create(&script).unwrap();
    writeln!(file, "#!/bin/sh").unwrap();
    writeln!(file, "echo '{{\"error\": \"boom\"}}'").unwrap();
    drop(file);

    let result = run(Path::new("sh"), [script.as_os_str()]).await.unwrap();
    assert!(result.success);

    let value: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(value["error"], serde_json::json!("boom"));
}

#[tokio::test]
async fn runner_concurrent_calls_are_independent() {
    let (a, b) = tokio::join!(
        run(Path::new("sh"), ["-c", "echo first"]),
        run(Path::new("sh"), ["-c", "echo second"]),
    );
    assert_eq!(a.unwrap().stdout.trim(), "first");
    assert_eq!(b.unwrap().stdout.trim(), "second");
}

#[tokio::test]
async fn config_target_conflict_fails_before_any_spawn() {
    let result = Config::with_options(ConfigOptions {
        system: true,
        file: Some("test".into()),
    });
    assert!(result.is_err());
}

#[tokio::test]
async fn config_unknown_key_fails_before_any_spawn() {
    let config = Config::new();
    assert!(config.get("nonexistent_key").await.is_err());
    assert!(config.set("nonexistent_key", "value").await.is_err());
}

// The remaining tests need a real conda installation.

#[tokio::test]
#[ignore]
async fn conda_info_contains_fixed_keys() {
    let info = conda_client::info().await.unwrap();
    assert!(!info.conda_version.is_empty());
    assert!(!info.platform.is_empty());
    assert!(info.root_prefix.is_absolute());
    assert!(!info.rc_path.as_os_str().is_empty());
    assert!(!info.envs_dirs.is_empty());
    assert!(!info.pkgs_dirs.is_empty());
}

#[tokio::test]
#[ignore]
async fn conda_version_passes_through_as_text() {
    let text = conda_client::invoke::runner::call_text(["--version"])
        .await
        .unwrap();
    assert!(text.contains("conda"));
}

#[tokio::test]
#[ignore]
async fn conda_search_returns_a_map() {
    let results = conda_client::search(Some("python")).await.unwrap();
    assert!(results.contains_key("python"));
}

#[tokio::test]
#[ignore]
async fn conda_launch_nonexistent_app_resolves_with_error() {
    let outcome = conda_client::launch("nonexistent").await.unwrap();
    assert!(outcome.is_error());
}

#[tokio::test]
#[ignore]
async fn conda_launch_non_app_package_resolves_with_error() {
    let outcome = conda_client::launch("python").await.unwrap();
    assert!(outcome.is_error());
}

#[tokio::test]
#[ignore]
async fn conda_config_get_channels() {
    let value = Config::new().get("channels").await.unwrap();
    assert!(value.is_object());
}

#[tokio::test]
#[ignore]
async fn conda_config_set_use_pip_roundtrip() {
    let config = Config::new();

    let on = config.set("use_pip", true).await.unwrap();
    assert!(on.success);

    let off = config.set("use_pip", false).await.unwrap();
    assert!(off.success);
}

#[tokio::test]
#[ignore]
async fn conda_get_envs_is_nonempty_and_root_first() {
    let envs = Env::get_envs().await.unwrap();
    assert!(!envs.is_empty());
    assert!(envs[0].is_root());
}

#[tokio::test]
#[ignore]
async fn conda_install_python_into_first_env() {
    let envs = Env::get_envs().await.unwrap();
    let outcome = envs[0].install(&["python".to_string()]).await.unwrap();
    assert!(outcome.success);
}

#[tokio::test]
#[ignore]
async fn conda_linked_returns_packages() {
    let envs = Env::get_envs().await.unwrap();

    let packages = envs[0].linked().await.unwrap();
    assert!(!packages.is_empty());
    assert!(!packages[0].name.is_empty());

    let dists = envs[0].linked_simple().await.unwrap();
    assert_eq!(dists.len(), packages.len());
}

#[tokio::test]
#[ignore]
async fn conda_revisions_is_nonempty() {
    let envs = Env::get_envs().await.unwrap();
    let revisions = envs[0].revisions().await.unwrap();
    assert!(!revisions.is_empty());
    assert_eq!(revisions[0].rev, 0);
}
