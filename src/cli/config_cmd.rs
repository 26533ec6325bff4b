//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::audio::GainSetting;
use crate::domain::error::ConfigError;
use crate::domain::intercom::Collection;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    // Validate value based on key type
    validate_config_value(key, value)?;

    // Load existing config
    let mut config = store.load().await?;

    // Update the appropriate field
    match key {
        "server_url" => config.server_url = Some(value.trim_end_matches('/').to_string()),
        "gain" => {
            // Already validated, parse cannot fail here
            config.gain = value.parse::<f32>().ok();
        }
        "collection" => config.collection = Some(value.to_string()),
        "preview" => {
            config.preview = Some(parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?)
        }
        _ => unreachable!(), // Already validated
    }

    // Save config
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "server_url" => config.server_url,
        "gain" => config.gain.map(|g| g.to_string()),
        "collection" => config.collection,
        "preview" => config.preview.map(|b| b.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "server_url",
        config.server_url.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "gain",
        &config
            .gain
            .map(|g| g.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "collection",
        config.collection.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "preview",
        &config
            .preview
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "server_url" => {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be an http:// or https:// URL".to_string(),
                });
            }
        }
        "gain" => {
            let gain = value
                .parse::<f32>()
                .map_err(|_| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be a number".to_string(),
                })?;
            if !(GainSetting::MIN..=GainSetting::MAX).contains(&gain) {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: format!(
                        "Value must be between {} and {}",
                        GainSetting::MIN,
                        GainSetting::MAX
                    ),
                });
            }
        }
        "collection" => {
            value
                .parse::<Collection>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "preview" => {
            parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?;
        }
        _ => {}
    }
    Ok(())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn validate_gain_valid() {
        assert!(validate_config_value("gain", "0.0").is_ok());
        assert!(validate_config_value("gain", "1.0").is_ok());
        assert!(validate_config_value("gain", "2.0").is_ok());
    }

    #[test]
    fn validate_gain_invalid() {
        assert!(validate_config_value("gain", "loud").is_err());
        assert!(validate_config_value("gain", "-0.5").is_err());
        assert!(validate_config_value("gain", "3.0").is_err());
    }

    #[test]
    fn validate_server_url() {
        assert!(validate_config_value("server_url", "http://unit.local:5000").is_ok());
        assert!(validate_config_value("server_url", "https://doorline.example.com").is_ok());
        assert!(validate_config_value("server_url", "unit.local").is_err());
    }

    #[test]
    fn validate_collection_valid() {
        assert!(validate_config_value("collection", "messages").is_ok());
        assert!(validate_config_value("collection", "records").is_ok());
    }

    #[test]
    fn validate_collection_invalid() {
        assert!(validate_config_value("collection", "invalid").is_err());
    }
}
