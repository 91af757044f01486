use routedoc_core::{AppConfig, ConfigError};
use serde::Deserialize;
use serial_test::serial;
use std::fs;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
struct ServerSection {
    addr: String,
    workers: u32,
}

#[test]
fn get_dotted_key() {
    let config = AppConfig::from_yaml_str("server:\n  addr: 0.0.0.0:3000\n", "test").unwrap();
    let addr: String = config.get("server.addr").unwrap();
    assert_eq!(addr, "0.0.0.0:3000");
    assert!(config.contains_key("server"));
    assert!(!config.contains_key("server.port"));
}

#[test]
fn missing_key_is_not_found() {
    let config = AppConfig::empty();
    let err = config.get::<String>("server.addr").unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(ref key) if key == "server.addr"));
}

#[test]
fn wrong_shape_is_deserialize_error() {
    let config = AppConfig::from_yaml_str("server:\n  workers: many\n", "test").unwrap();
    let err = config.get::<u32>("server.workers").unwrap_err();
    assert!(matches!(err, ConfigError::Deserialize { .. }));
}

#[test]
fn missing_section_falls_back_to_default() {
    let section: ServerSection = AppConfig::empty().section("server").unwrap();
    assert_eq!(section, ServerSection::default());
}

#[test]
fn invalid_yaml_is_load_error() {
    let err = AppConfig::from_yaml_str("server: [unclosed", "test").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
#[serial]
fn profile_file_merges_over_base() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("application.yaml"),
        "server:\n  addr: 127.0.0.1:3000\n  workers: 2\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("application-prod.yaml"),
        "server:\n  addr: 0.0.0.0:80\n",
    )
    .unwrap();

    let config = AppConfig::load_from_dir(dir.path(), "prod").unwrap();
    let server: ServerSection = config.section("server").unwrap();

    assert_eq!(config.profile(), "prod");
    assert_eq!(server.addr, "0.0.0.0:80");
    assert_eq!(server.workers, 2);
}

#[test]
#[serial]
fn env_var_overrides_leaf() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("application.yaml"),
        "routedoctest:\n  workers: 2\n",
    )
    .unwrap();

    std::env::set_var("ROUTEDOCTEST_WORKERS", "8");
    let config = AppConfig::load_from_dir(dir.path(), "dev");
    std::env::remove_var("ROUTEDOCTEST_WORKERS");

    let workers: u32 = config.unwrap().get("routedoctest.workers").unwrap();
    assert_eq!(workers, 8);
}

#[test]
#[serial]
fn missing_files_yield_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from_dir(dir.path(), "dev").unwrap();
    assert!(!config.contains_key("server"));
}
