use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};
use wages_core::config::{resolve_config_path, DEFAULT_SOURCE_FILE};
use wages_core::WagesConfig;
use wages_parser::ReportLayout;

#[test]
fn defaults_match_the_published_report() {
    let config = WagesConfig::default();
    assert_eq!(config.source_path(), Path::new(DEFAULT_SOURCE_FILE));
    assert_eq!(config.layout, ReportLayout::default());
    assert_eq!(config.report.top_jobs, 10);
}

#[test]
fn load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let config_content = r#"
[source]
path = "data/wages_2023.csv"

[layout]
all_island_label = "Sri Lanka (d )"
job_markers = ["Tea", "Fishing"]

[report]
top_jobs = 5
"#;
    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = WagesConfig::from_file(temp_file.path()).unwrap();
    assert_eq!(config.source_path(), Path::new("data/wages_2023.csv"));
    assert_eq!(config.layout.all_island_label, "Sri Lanka (d )");
    assert_eq!(config.layout.job_markers, vec!["Tea", "Fishing"]);
    assert_eq!(
        config.layout.female_tokens,
        ReportLayout::default().female_tokens
    );
    assert_eq!(config.report.top_jobs, 5);
}

#[test]
fn partial_config_keeps_defaults() {
    let config = WagesConfig::from_toml_str("[report]\ntop_jobs = 3\n").unwrap();
    assert_eq!(config.source_path(), Path::new(DEFAULT_SOURCE_FILE));
    assert_eq!(config.layout, ReportLayout::default());
    assert_eq!(config.report.top_jobs, 3);
}

#[test]
fn invalid_toml_is_rejected() {
    let err = WagesConfig::from_toml_str("[report]\ntop_jobs = \"many\"\n").unwrap_err();
    assert!(err.to_string().contains("wages config"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = WagesConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn explicit_path_wins_over_env_and_fallback() {
    let explicit = PathBuf::from("explicit.toml");
    let resolved = resolve_config_path(
        Some(&explicit),
        Some("env.toml"),
        Path::new("fallback.toml"),
    );
    assert_eq!(resolved, Some(explicit));
}

#[test]
fn env_path_used_when_no_flag() {
    let resolved = resolve_config_path(None, Some("env.toml"), Path::new("fallback.toml"));
    assert_eq!(resolved, Some(PathBuf::from("env.toml")));

    let blank = resolve_config_path(None, Some("  "), Path::new("does-not-exist.toml"));
    assert_eq!(blank, None);
}

#[test]
fn fallback_only_when_present() {
    let dir = TempDir::new().unwrap();
    let fallback = dir.path().join("wages.toml");
    assert_eq!(resolve_config_path(None, None, &fallback), None);

    std::fs::write(&fallback, "").unwrap();
    assert_eq!(resolve_config_path(None, None, &fallback), Some(fallback));
}

#[test]
fn source_override_replaces_path() {
    let config = WagesConfig::default().with_source_path("elsewhere.csv");
    assert_eq!(config.source_path(), Path::new("elsewhere.csv"));
}
