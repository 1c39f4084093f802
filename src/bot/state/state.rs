use std::{fs, path::Path};

use dotenvy::{dotenv, var};
use tracing::{debug, info};

use crate::bot::state::def::{default_prefix, BotConfig, BotError, BotResult, ConfigError, PluginKind, Settings};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://plugbot.db";

impl BotConfig {
    pub fn from_env() -> BotResult<Self> {
        if dotenv().is_ok() {
            debug!("Loaded .env file");
        }

        let token = var("DISCORD_TOKEN").map_err(|_| BotError::Custom("DISCORD_TOKEN is not set".into()))?;
        let database_url = var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let settings = match var("PLUGBOT_CONFIG") {
            Ok(path) => Settings::load(Path::new(&path))?,
            Err(_) => Settings::default(),
        };

        Ok(BotConfig { token, database_url, settings })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings { prefix: default_prefix(), disabled: Default::default(), disabled_events: Default::default() }
    }
}

impl Settings {
    pub fn load(path: &Path) -> BotResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings = Self::from_json(&content)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(content: &str) -> BotResult<Self> {
        let mut settings: Settings = serde_json::from_str(content)?;
        settings.disabled = settings.disabled.into_iter().map(|n| n.to_lowercase()).collect();
        settings.disabled_events = settings.disabled_events.into_iter().map(|n| n.to_lowercase()).collect();
        if settings.prefix.trim().is_empty() {
            return Err(BotError::Custom("Command prefix must not be empty".into()));
        }
        Ok(settings)
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(&name.to_lowercase())
    }
}

/// Returns the trimmed field, or a missing-field error when it is blank.
pub fn require_field(kind: PluginKind, field: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingField { kind, field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_fall_back_to_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.prefix, "!");
    }

    #[test]
    fn disabled_names_are_case_insensitive() {
        let settings = Settings::from_json(r#"{"prefix": "?", "disabled": ["Tag"]}"#).unwrap();
        assert_eq!(settings.prefix, "?");
        assert!(settings.is_disabled("tag"));
        assert!(settings.is_disabled("TAG"));
        assert!(!settings.is_disabled("help"));
        assert!(settings.disabled_events.is_empty());

        let settings = Settings::from_json(r#"{"disabled_events": ["Ready"]}"#).unwrap();
        assert!(settings.disabled_events.contains("ready"));
        assert!(!settings.is_disabled("ready"));
    }

    #[test]
    fn blank_prefix_is_rejected() {
        assert!(matches!(Settings::from_json(r#"{"prefix": " "}"#), Err(BotError::Custom(_))));
        assert!(matches!(Settings::from_json("not json"), Err(BotError::JsonError(_))));
    }

    #[test]
    fn require_field_trims_and_rejects_blank() {
        assert_eq!(require_field(PluginKind::Command, "name", " ban ".into()).unwrap(), "ban");
        let err = require_field(PluginKind::Event, "name", "\t".into()).unwrap_err();
        assert_eq!(err, ConfigError::MissingField { kind: PluginKind::Event, field: "name" });
        assert_eq!(err.to_string(), "Event name is required");
    }
}
