//! Converter settings loaded through the shared config resolution

use ptt_common::config::{load_toml_or_default, resolve_config_file, CONFIG_ENV_VAR};
use ptt_convert::settings::ConvertConfig;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
[source]
database_path = "/srv/urnik/urnik.db"
term = "FRI 2015/2016, zimski semester"
lecture_types = ["P"]

[heuristics]
designated_classroom = "12"
professor_available_hours = 80

[export]
directory = "/srv/urnik/gen"

[logging]
level = "debug"
"#;

#[test]
#[serial]
fn test_env_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, CONFIG).unwrap();

    env::set_var(CONFIG_ENV_VAR, &path);
    let resolved = resolve_config_file(None, CONFIG_ENV_VAR);
    env::remove_var(CONFIG_ENV_VAR);

    let config: ConvertConfig = load_toml_or_default(resolved.as_deref()).unwrap();
    assert_eq!(config.source.term, "FRI 2015/2016, zimski semester");
    assert_eq!(config.source.lecture_types, vec!["P".to_string()]);
    assert_eq!(config.heuristics.designated_classroom.as_str(), "12");
    assert_eq!(config.heuristics.professor_available_hours, 80);
    assert_eq!(config.logging.level, "debug");

    // Untouched fields keep their defaults
    assert_eq!(config.heuristics.excluded_subject_marker, "(EF)");
    assert_eq!(config.export.namespace, "http://stanovnik.net/ParallelTimetables");
}

#[test]
#[serial]
fn test_cli_config_beats_env() {
    let dir = TempDir::new().unwrap();
    let from_env = dir.path().join("env.toml");
    let from_cli = dir.path().join("cli.toml");
    fs::write(&from_env, "[logging]\nlevel = \"warn\"\n").unwrap();
    fs::write(&from_cli, "[logging]\nlevel = \"trace\"\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &from_env);
    let resolved = resolve_config_file(Some(&from_cli), CONFIG_ENV_VAR);
    env::remove_var(CONFIG_ENV_VAR);

    let config: ConvertConfig = load_toml_or_default(resolved.as_deref()).unwrap();
    assert_eq!(config.logging.level, "trace");
}

#[test]
fn test_numeric_designated_classroom_must_be_quoted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[heuristics]\ndesignated_classroom = 97\n").unwrap();

    assert!(load_toml_or_default::<ConvertConfig>(Some(&path)).is_err());
}
