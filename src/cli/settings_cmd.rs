//! Settings command handler.
//!
//! The unit exposes a single flat settings object. `set` is implemented as
//! fetch, mutate one field, replace, because the server has no partial update.

use thiserror::Error;

use crate::application::ports::{SettingsGateway, StoreError};
use crate::domain::intercom::DeviceSettings;

use super::args::SettingsAction;
use super::presenter::Presenter;

/// Wire names of the settings fields, for validation and help output
pub const VALID_SETTINGS_KEYS: &[&str] = &[
    "autoRing",
    "autoRingMinSpan",
    "autoRingMaxSpan",
    "ringOnTime",
    "ringOffTime",
    "messages",
    "randomMessages",
    "ringCount",
];

/// Errors from the settings command
#[derive(Debug, Error)]
pub enum SettingsCmdError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unknown settings key \"{0}\". Valid keys: autoRing, autoRingMinSpan, autoRingMaxSpan, ringOnTime, ringOffTime, messages, randomMessages, ringCount")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Handle settings subcommand
pub async fn handle_settings_command<G: SettingsGateway>(
    action: SettingsAction,
    gateway: &G,
    presenter: &Presenter,
) -> Result<(), SettingsCmdError> {
    match action {
        SettingsAction::Show => handle_show(gateway, presenter).await,
        SettingsAction::Set { key, value } => {
            handle_set(gateway, presenter, &key, &value).await
        }
    }
}

async fn handle_show<G: SettingsGateway>(
    gateway: &G,
    presenter: &Presenter,
) -> Result<(), SettingsCmdError> {
    let settings = gateway.fetch().await?;
    print_settings(presenter, &settings);
    Ok(())
}

async fn handle_set<G: SettingsGateway>(
    gateway: &G,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), SettingsCmdError> {
    let mut settings = gateway.fetch().await?;
    apply_field(&mut settings, key, value)?;
    gateway.replace(&settings).await?;
    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

fn print_settings(presenter: &Presenter, settings: &DeviceSettings) {
    presenter.key_value("autoRing", &settings.auto_ring.to_string());
    presenter.key_value("autoRingMinSpan", &settings.auto_ring_min_span.to_string());
    presenter.key_value("autoRingMaxSpan", &settings.auto_ring_max_span.to_string());
    presenter.key_value("ringOnTime", &settings.ring_on_time.to_string());
    presenter.key_value("ringOffTime", &settings.ring_off_time.to_string());
    presenter.key_value("messages", &settings.messages.to_string());
    presenter.key_value("randomMessages", &settings.random_messages.to_string());
    presenter.key_value("ringCount", &settings.ring_count.to_string());
}

/// Set one field by its wire name
fn apply_field(
    settings: &mut DeviceSettings,
    key: &str,
    value: &str,
) -> Result<(), SettingsCmdError> {
    match key {
        "autoRing" => settings.auto_ring = parse_bool(key, value)?,
        "autoRingMinSpan" => settings.auto_ring_min_span = parse_u32(key, value)?,
        "autoRingMaxSpan" => settings.auto_ring_max_span = parse_u32(key, value)?,
        "ringOnTime" => settings.ring_on_time = parse_u32(key, value)?,
        "ringOffTime" => settings.ring_off_time = parse_u32(key, value)?,
        "messages" => settings.messages = parse_bool(key, value)?,
        "randomMessages" => settings.random_messages = parse_bool(key, value)?,
        "ringCount" => settings.ring_count = parse_u32(key, value)?,
        other => return Err(SettingsCmdError::UnknownKey(other.to_string())),
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsCmdError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(SettingsCmdError::InvalidValue {
            key: key.to_string(),
            message: "must be 'true' or 'false'".to_string(),
        }),
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, SettingsCmdError> {
    value
        .parse::<u32>()
        .map_err(|_| SettingsCmdError::InvalidValue {
            key: key.to_string(),
            message: "must be a non-negative integer".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_bool_field() {
        let mut settings = DeviceSettings::default();
        apply_field(&mut settings, "autoRing", "true").unwrap();
        assert!(settings.auto_ring);
        apply_field(&mut settings, "autoRing", "no").unwrap();
        assert!(!settings.auto_ring);
    }

    #[test]
    fn apply_numeric_field() {
        let mut settings = DeviceSettings::default();
        apply_field(&mut settings, "ringCount", "4").unwrap();
        assert_eq!(settings.ring_count, 4);
    }

    #[test]
    fn rejects_unknown_key() {
        let mut settings = DeviceSettings::default();
        let err = apply_field(&mut settings, "volume", "3").unwrap_err();
        assert!(matches!(err, SettingsCmdError::UnknownKey(_)));
    }

    #[test]
    fn accepts_every_wire_key() {
        let mut settings = DeviceSettings::default();
        for key in VALID_SETTINGS_KEYS {
            assert!(apply_field(&mut settings, key, "1").is_ok(), "{}", key);
        }
    }

    #[test]
    fn rejects_bad_values() {
        let mut settings = DeviceSettings::default();
        assert!(apply_field(&mut settings, "ringCount", "lots").is_err());
        assert!(apply_field(&mut settings, "messages", "sometimes").is_err());
        assert!(apply_field(&mut settings, "ringOnTime", "-2").is_err());
    }
}
