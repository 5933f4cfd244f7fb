//! Tests for layered settings loading

use std::path::PathBuf;

use tempfile::TempDir;

use docktree::application::services::OutputFormat;
use docktree::application::ApplicationError;
use docktree::config::{global_config_path, RawSettings, Settings};

#[test]
fn given_explicit_config_file_when_loading_then_values_override_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("docktree.toml");
    std::fs::write(
        &path,
        r#"
docker_command = "podman"
format = "json"
intermediate = true
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).unwrap();

    // Assert
    assert_eq!(settings.docker_command, "podman");
    assert_eq!(settings.format, OutputFormat::Json);
    assert!(settings.intermediate);
    assert!(!settings.splice);
}

#[test]
fn given_input_with_tilde_when_loading_then_path_is_expanded() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("docktree.toml");
    std::fs::write(&path, "input = \"~/dumps/images.json\"\n").unwrap();

    let settings = Settings::load(Some(path.as_path())).unwrap();

    let home = PathBuf::from(std::env::var("HOME").unwrap());
    assert_eq!(settings.input, Some(home.join("dumps/images.json")));
}

#[test]
fn given_missing_config_file_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load(Some(temp.path().join("absent.toml").as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_format_value_when_loading_then_config_error_names_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    std::fs::write(&path, "format = \"yaml\"\n").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(err.to_string().contains("bad.toml"), "{err}");
}

#[test]
fn given_template_when_parsing_then_all_defaults_apply() {
    let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();

    assert!(raw.docker_command.is_none());
    assert!(raw.format.is_none());
    assert!(raw.intermediate.is_none());
}

#[test]
fn given_template_when_uncommented_then_parses_to_documented_defaults() {
    let uncommented: String = Settings::template()
        .lines()
        .filter_map(|line| line.strip_prefix("# "))
        .filter(|line| line.contains(" = "))
        .map(|line| format!("{line}\n"))
        .collect();

    let raw: RawSettings = toml::from_str(&uncommented).unwrap();

    assert_eq!(raw.docker_command.as_deref(), Some("docker"));
    assert_eq!(raw.format, Some(OutputFormat::Ascii));
    assert_eq!(raw.intermediate, Some(false));
    assert_eq!(raw.splice, Some(false));
}

#[test]
fn given_effective_settings_when_rendering_toml_then_contains_every_key() {
    let text = Settings::default().to_toml().unwrap();

    for key in ["docker_command", "format", "intermediate", "splice"] {
        assert!(text.contains(key), "missing {key} in:\n{text}");
    }
}

#[test]
fn given_platform_dirs_when_resolving_global_path_then_ends_with_file_name() {
    if let Some(path) = global_config_path() {
        assert!(path.ends_with("docktree/docktree.toml"));
    }
}
