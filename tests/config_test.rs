use std::io::Write;

use segmock::api::FaultPolicy;
use segmock::config::{AppConfig, DiagnosticSection, LogFormat};

#[test]
fn defaults_match_mock_and_wrapper_ports() {
    let config = AppConfig::default();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8001);
    assert_eq!(config.diagnostic.host, "0.0.0.0");
    assert_eq!(config.diagnostic.port, 8000);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Text);
    assert!(config.logging.file.is_none());
    assert!(config.catalog.path.is_none());
}

#[test]
fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 9100

[logging]
level = ""
format = "json"

[catalog]
path = "fixtures/catalog.json"

[diagnostic]
root = "/srv/segmentation"
traces = false
"#
    )
    .unwrap();

    let config = AppConfig::load_from(file.path()).unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.catalog.path.as_deref(), Some("fixtures/catalog.json"));
    assert_eq!(config.diagnostic.port, 8000);
    assert_eq!(config.diagnostic.fault_policy(), FaultPolicy::Conceal);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.diagnostic.catalog, "catalog.json");
    assert_eq!(config.diagnostic.logfile, "debug.log");
}

#[test]
fn diagnostic_logging_is_debug_with_file() {
    let config = AppConfig::default();
    let logging = config.diagnostic_logging();

    assert_eq!(logging.level, "debug");
    assert_eq!(logging.file.as_deref(), Some("debug.log"));
}

#[test]
fn catalog_path_resolves_against_root() {
    let section = DiagnosticSection {
        root: "/srv/segmentation".to_string(),
        ..Default::default()
    };

    assert_eq!(
        section.catalog_path(),
        std::path::Path::new("/srv/segmentation/catalog.json")
    );
    assert_eq!(section.fault_policy(), FaultPolicy::Expose);
}
