//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/docktree/docktree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `DOCKTREE_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::OutputFormat;
use crate::application::ApplicationError;

/// Unified configuration for docktree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Engine CLI used to list images (default: "docker")
    pub docker_command: String,
    /// Read layers from this JSON dump instead of the engine
    pub input: Option<PathBuf>,
    /// Default output format
    pub format: OutputFormat,
    /// Show untagged intermediate layers
    pub intermediate: bool,
    /// Re-link children of pruned layers to their nearest tagged ancestor
    pub splice: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docker_command: "docker".into(),
            input: None,
            format: OutputFormat::Ascii,
            intermediate: false,
            splice: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub docker_command: Option<String>,
    pub input: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub intermediate: Option<bool>,
    pub splice: Option<bool>,
}

/// Get the XDG config directory for docktree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "docktree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("docktree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the value as is.
fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.docker_command = expand(&self.docker_command);
        if let Some(input) = &self.input {
            self.input = Some(PathBuf::from(expand(input.to_string_lossy().as_ref())));
        }
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            docker_command: overlay
                .docker_command
                .clone()
                .unwrap_or_else(|| self.docker_command.clone()),
            input: overlay.input.clone().or_else(|| self.input.clone()),
            format: overlay.format.unwrap_or(self.format),
            intermediate: overlay.intermediate.unwrap_or(self.intermediate),
            splice: overlay.splice.unwrap_or(self.splice),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current, Self::environment())?;

        current.expand_paths();
        Ok(current)
    }

    fn environment() -> Environment {
        Environment::with_prefix("DOCKTREE")
            .prefix_separator("_")
            .separator("__")
    }

    /// Apply DOCKTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(val) = present(config.get_string("docker_command"))? {
            settings.docker_command = val;
        }
        if let Some(val) = present(config.get_string("input"))? {
            settings.input = Some(PathBuf::from(val));
        }
        if let Some(val) = present(config.get_string("format"))? {
            settings.format =
                OutputFormat::from_str(&val, true).map_err(|e| ApplicationError::Config {
                    message: format!("DOCKTREE_FORMAT: {e}"),
                })?;
        }
        if let Some(val) = present(config.get_bool("intermediate"))? {
            settings.intermediate = val;
        }
        if let Some(val) = present(config.get_bool("splice"))? {
            settings.splice = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# docktree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/docktree/docktree.toml
#   File:   docktree --config <file>
#   Env:    DOCKTREE_* environment variables (e.g. DOCKTREE_FORMAT=json)
# Command-line flags override all of these.

# Engine CLI used to list images (docker, podman, ...)
# docker_command = "docker"

# Read layers from a JSON dump of `GET /images/json?all=1` instead of the engine
# input = "~/layers.json"

# Output format: "ascii", "json" or "tree"
# format = "ascii"

# Show untagged intermediate layers
# intermediate = false

# Keep tagged images below their nearest tagged ancestor when pruning
# splice = false
"#
        .to_string()
    }
}

/// `None` for an unset key, an error for a value of the wrong type.
fn present<T>(lookup: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match lookup {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::environment().source(Some(map))
    }

    #[test]
    fn given_no_config_when_defaulting_then_uses_docker_and_ascii() {
        let settings = Settings::default();
        assert_eq!(settings.docker_command, "docker");
        assert_eq!(settings.format, OutputFormat::Ascii);
        assert!(!settings.intermediate);
        assert!(settings.input.is_none());
    }

    #[test]
    fn given_tilde_in_input_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            input: Some(PathBuf::from("~/layers.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let input = settings.input.unwrap();
        assert!(
            input.to_string_lossy().starts_with(&home),
            "input should start with home dir: {}",
            input.display()
        );
    }

    #[test]
    fn given_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            format: Some(OutputFormat::Json),
            intermediate: Some(true),
            ..RawSettings::default()
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.format, OutputFormat::Json);
        assert!(result.intermediate);
        assert_eq!(result.docker_command, "docker");
        assert!(!result.splice);
    }

    #[test]
    fn given_env_vars_when_applying_overrides_then_they_replace_values() {
        let env = env_with(&[
            ("DOCKTREE_FORMAT", "TREE"),
            ("DOCKTREE_DOCKER_COMMAND", "podman"),
            ("DOCKTREE_SPLICE", "true"),
        ]);

        let settings = Settings::apply_env_overrides(Settings::default(), env).unwrap();

        assert_eq!(settings.format, OutputFormat::Tree);
        assert_eq!(settings.docker_command, "podman");
        assert!(settings.splice);
    }

    #[test]
    fn given_unknown_format_in_env_when_applying_overrides_then_errors() {
        let env = env_with(&[("DOCKTREE_FORMAT", "yaml")]);

        let result = Settings::apply_env_overrides(Settings::default(), env);

        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_malformed_bool_in_env_when_applying_overrides_then_errors() {
        let env = env_with(&[("DOCKTREE_INTERMEDIATE", "maybe")]);

        let result = Settings::apply_env_overrides(Settings::default(), env);

        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_double_underscore_prefix_when_applying_overrides_then_it_is_ignored() {
        let env = env_with(&[("DOCKTREE__FORMAT", "json")]);

        let settings = Settings::apply_env_overrides(Settings::default(), env).unwrap();

        assert_eq!(settings.format, OutputFormat::Ascii);
    }

    #[test]
    fn given_no_env_vars_when_applying_overrides_then_settings_are_unchanged() {
        let settings = Settings::apply_env_overrides(Settings::default(), env_with(&[])).unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_settings_when_serializing_then_roundtrips_through_toml() {
        let settings = Settings {
            format: OutputFormat::Json,
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(raw.format, Some(OutputFormat::Json));
    }
}
