use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

const SUPPORTED_VERSION: &str = "1.0";

/// Loads a config file, choosing the parser from the extension
/// (`.yaml`/`.yml` → YAML, anything else → JSON).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let mut config = if is_yaml {
        load_config_from_yaml_str(&content)?
    } else {
        load_config_from_str(&content)?
    };
    apply_env_overrides(&mut config);

    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Loads the config from the platform config directory, falling back to the
/// built-in defaults when no file exists there.
pub fn load_default_config() -> Result<Config, ConfigError> {
    match default_config_path() {
        Some(path) if path.exists() => load_config(path),
        _ => {
            let mut config = Config::default();
            apply_env_overrides(&mut config);
            Ok(config)
        }
    }
}

/// `<config dir>/reportgen/config.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reportgen").join("config.json"))
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;
    load_config_from_value(json_value)
}

pub fn load_config_from_yaml_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_yaml::from_str(content)?;
    load_config_from_value(json_value)
}

fn load_config_from_value(json_value: serde_json::Value) -> Result<Config, ConfigError> {
    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Overrides store connection settings from `CLICKHOUSE_*` variables.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = std::env::var("CLICKHOUSE_URL") {
        config.store.url = url;
    }
    if let Ok(database) = std::env::var("CLICKHOUSE_DATABASE") {
        config.store.database = database;
    }
    if let Ok(user) = std::env::var("CLICKHOUSE_USER") {
        config.store.user = user;
    }
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != SUPPORTED_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let schedule = &config.schedule;
    let ranges = [
        ("baseline_hour", schedule.baseline_hour, 23),
        ("default_minute", schedule.default_minute, 59),
        ("default_hour", schedule.default_hour, 23),
        ("default_weekday", schedule.default_weekday, 6),
    ];
    for (name, value, max) in ranges {
        if value > max {
            return Err(ConfigError::Validation {
                message: format!("schedule.{} must be between 0 and {}, got {}", name, max, value),
            });
        }
    }

    for (label, expression) in &config.field_mappings {
        if label.trim().is_empty() {
            return Err(ConfigError::InvalidMapping {
                label: label.clone(),
                reason: "Label must not be blank".to_string(),
            });
        }
        if expression.trim().is_empty() {
            return Err(ConfigError::InvalidMapping {
                label: label.clone(),
                reason: "Expression must not be blank".to_string(),
            });
        }
    }

    Ok(())
}
