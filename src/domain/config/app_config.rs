//! Client configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::audio::GainSetting;
use crate::domain::intercom::Collection;

/// Default server address (the Flask development port the unit listens on)
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Client configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub gain: Option<f32>,
    pub collection: Option<String>,
    pub preview: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            gain: Some(1.0),
            collection: Some(Collection::Messages.as_str().to_string()),
            preview: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            server_url: other.server_url.or(self.server_url),
            gain: other.gain.or(self.gain),
            collection: other.collection.or(self.collection),
            preview: other.preview.or(self.preview),
        }
    }

    /// Get the server URL, or the default if not set
    pub fn server_url_or_default(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Get the gain as a validated setting, or unity if not set
    pub fn gain_or_default(&self) -> GainSetting {
        self.gain.map(GainSetting::new).unwrap_or_default()
    }

    /// Get the collection, or `messages` if not set/invalid
    pub fn collection_or_default(&self) -> Collection {
        self.collection
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the preview setting, or true if not set
    pub fn preview_or_default(&self) -> bool {
        self.preview.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_values() {
        let config = AppConfig::empty();
        assert!(config.server_url.is_none());
        assert!(config.gain.is_none());
    }

    #[test]
    fn defaults_are_complete() {
        let config = AppConfig::defaults();
        assert_eq!(config.server_url_or_default(), DEFAULT_SERVER_URL);
        assert_eq!(config.gain_or_default().value(), 1.0);
        assert_eq!(config.collection_or_default(), Collection::Messages);
        assert!(config.preview_or_default());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            server_url: Some("http://unit.local:5000".to_string()),
            gain: Some(1.5),
            collection: None,
            preview: Some(true),
        };
        let overlay = AppConfig {
            server_url: None,
            gain: Some(0.5),
            collection: Some("records".to_string()),
            preview: None,
        };

        let merged = base.merge(overlay);
        assert_eq!(merged.server_url.as_deref(), Some("http://unit.local:5000"));
        assert_eq!(merged.gain, Some(0.5));
        assert_eq!(merged.collection.as_deref(), Some("records"));
        assert_eq!(merged.preview, Some(true));
    }

    #[test]
    fn invalid_collection_falls_back_to_messages() {
        let config = AppConfig {
            collection: Some("archive".to_string()),
            ..Default::default()
        };
        assert_eq!(config.collection_or_default(), Collection::Messages);
    }

    #[test]
    fn out_of_range_gain_is_clamped() {
        let config = AppConfig {
            gain: Some(9.0),
            ..Default::default()
        };
        assert_eq!(config.gain_or_default().value(), GainSetting::MAX);
    }
}
