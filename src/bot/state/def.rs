use std::{collections::HashSet, fmt, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bot::usage::arguments::ArgumentError;

pub type BotResult<T> = Result<T, BotError>;

pub struct BotConfig {
    pub token: String,
    pub database_url: String,
    pub settings: Settings,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Settings {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    //Commands and events refused at load time
    #[serde(default)]
    pub disabled: HashSet<String>,
    #[serde(default)]
    pub disabled_events: HashSet<String>,
}

pub(crate) fn default_prefix() -> String {
    "!".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind { Command, Event }

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PluginKind::Command => "Command",
            PluginKind::Event => "Event",
        };
        write!(f, "{}", s)
    }
}

/// A plugin definition is incomplete or cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{kind} {field} is required")]
    MissingField { kind: PluginKind, field: &'static str },
    #[error("Malformed usage `{usage}`: {reason}")]
    MalformedUsage { usage: String, reason: String },
    #[error("Plugin `{0}` is disabled")]
    Disabled(String),
    #[error("A command named `{0}` is already registered")]
    DuplicateCommand(String),
}

/// The usage string parses but its arguments are in an impossible order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Cannot have a positional argument {token} after an optional argument {optional}")]
    RequiredAfterOptional { token: String, optional: String },
    #[error("Cannot have a command argument {token} after {variadic}")]
    TokenAfterVariadic { token: String, variadic: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Usage grammar error: {0}")]
    Grammar(#[from] GrammarError),
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Invalid plugin definition: {0}")]
    Definition(#[from] DefinitionError),
    #[error("Invalid arguments: {0}")]
    Argument(#[from] ArgumentError),
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("Discord error: {0}")]
    Serenity(#[from] serenity::Error),
    #[error("JSON deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("{0}")]
    Custom(String),
}
