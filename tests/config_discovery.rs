//! Integration tests for configuration discovery.
//!
//! These tests change the working directory and therefore run serially:
//! - Discovery in the current directory and its parents
//! - File name precedence within one directory
//! - A discovered config driving a full report run

use clap::Parser;
use jacoco_console_core::cli::Cli;
use jacoco_console_core::config::{
    discover_and_load_config, discover_config_from, load_config, resolve_settings,
};
use jacoco_console_core::error::CoverageError;
use jacoco_console_core::pipeline::{PipelineOutput, ReportKind, run_report};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};

const XML_FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/jacocoTestReport.xml"
);

/// Helper to get a safe fallback directory for restoring cwd.
fn get_fallback_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Helper to create a config file with content, creating parent directories.
fn create_config_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let config_path = dir.join(name);
    fs::create_dir_all(config_path.parent().expect("config has parent"))
        .expect("Failed to create config dir");
    fs::write(&config_path, content).expect("Failed to write config");
    config_path
}

/// Run `f` with `dir` as the working directory, restoring it afterwards.
fn with_current_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let fallback_dir = get_fallback_dir();
    let original_cwd = std::env::current_dir().unwrap_or(fallback_dir.clone());

    std::env::set_current_dir(dir).expect("Failed to cd to temp dir");
    let result = f();

    let _ = std::env::set_current_dir(&original_cwd)
        .or_else(|_| std::env::set_current_dir(&fallback_dir));
    result
}

#[test]
#[serial]
fn integration_discovers_config_in_current_directory() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    create_config_file(
        temp_dir.path(),
        "JacocoConsole.toml",
        r#"
[report]
show_total = false
target_classes = ["com.example.*"]
"#,
    );

    let result = with_current_dir(temp_dir.path(), discover_and_load_config);

    let (path, config) = result.expect("discovery failed").expect("config not found");
    assert_eq!(path.file_name().unwrap(), "JacocoConsole.toml");
    assert!(!config.report.show_total);
    assert_eq!(config.report.target_classes, vec!["com.example.*"]);
}

#[test]
#[serial]
fn integration_discovers_config_in_parent_directory() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    create_config_file(
        temp_dir.path(),
        "jacoco-console.toml",
        "[general]\nverbose = true\n",
    );
    let nested = temp_dir.path().join("app/src/main");
    fs::create_dir_all(&nested).expect("Failed to create nested dir");

    let result = with_current_dir(&nested, discover_and_load_config);

    let (path, config) = result.expect("discovery failed").expect("config not found");
    assert_eq!(path.file_name().unwrap(), "jacoco-console.toml");
    assert!(config.general.verbose);
}

#[test]
#[serial]
fn integration_nearest_directory_wins() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    create_config_file(
        temp_dir.path(),
        "JacocoConsole.toml",
        "[report]\nshow_total = false\n",
    );
    let nested = temp_dir.path().join("module");
    create_config_file(&nested, ".jacoco-console.toml", "[report]\nshow_total = true\n");

    let (path, config) = discover_config_from(&nested)
        .expect("discovery failed")
        .expect("config not found");

    assert_eq!(path, nested.join(".jacoco-console.toml"));
    assert!(config.report.show_total);
}

#[test]
#[serial]
fn integration_file_name_precedence_in_one_directory() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    create_config_file(
        temp_dir.path(),
        ".jacoco-console.toml",
        "[report]\nshow_package_summary = true\n",
    );
    create_config_file(
        temp_dir.path(),
        "JacocoConsole.toml",
        "[report]\nshow_package_summary = false\n",
    );

    let (path, config) = discover_config_from(temp_dir.path())
        .expect("discovery failed")
        .expect("config not found");

    assert_eq!(path.file_name().unwrap(), "JacocoConsole.toml");
    assert!(!config.report.show_package_summary);
}

#[test]
#[serial]
fn integration_explicit_config_skips_discovery() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    create_config_file(
        temp_dir.path(),
        "JacocoConsole.toml",
        "[report]\nshow_total = false\n",
    );
    let explicit = create_config_file(temp_dir.path(), "ci/coverage.toml", "[general]\nverbose = true\n");

    let result = with_current_dir(temp_dir.path(), || load_config(Some(&explicit)));

    let (path, config) = result.expect("load failed").expect("config not found");
    assert_eq!(path, explicit);
    assert!(config.general.verbose);
    assert!(config.report.show_total);
}

#[test]
#[serial]
fn integration_invalid_config_names_the_file() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    create_config_file(
        temp_dir.path(),
        "JacocoConsole.toml",
        "[report]\nshow_totals = false\n",
    );

    let result = with_current_dir(temp_dir.path(), discover_and_load_config);

    match result {
        Err(CoverageError::ConfigError { path, .. }) => {
            assert_eq!(path.unwrap().file_name().unwrap(), "JacocoConsole.toml");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
#[serial]
fn integration_discovered_config_drives_report() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let report_dir = temp_dir.path().join("build/coverage");
    fs::create_dir_all(&report_dir).expect("Failed to create report dir");
    fs::copy(XML_FIXTURE, report_dir.join("report.xml")).expect("Failed to copy fixture");
    create_config_file(
        temp_dir.path(),
        "JacocoConsole.toml",
        r#"
[report]
xml_path = "build/coverage/report.xml"
show_package_summary = false
target_classes = ["com.example.model.*"]
"#,
    );
    let cli = Cli::try_parse_from(["jacoco-console", "--show-total", "false"]).unwrap();

    let output = with_current_dir(temp_dir.path(), || {
        let (_, config) = discover_and_load_config()?.expect("config not found");
        let settings = resolve_settings(&cli, &config)?;
        assert_eq!(settings.kind, ReportKind::Xml);
        run_report(settings.kind, &settings.path, &settings.options)
    })
    .expect("report run failed");

    let PipelineOutput::Rendered(table) = output else {
        panic!("expected a rendered table, got {output:?}");
    };
    assert!(table.contains("  com.example.model.User"));
    assert!(!table.contains("PROJECT TOTAL"));
    assert!(!table.contains("(package)"));
    assert!(!table.contains("UserService"));
}
