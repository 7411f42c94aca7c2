//! Bot configuration unit settings.

use crate::profile::DEFAULT_PROFILE_EXTENSION;
use aia_error::{AiaResult, ConfigError, ConfigErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Text rendered in place of an unset whitelist location.
pub const WHITELIST_NOT_SET: &str = "[not set] (admin commands unavailable)";

/// Paths and feature flags of the configuration unit, loaded from TOML.
///
/// ```toml
/// working_directory = "/var/lib/aia"
/// whitelist_location = "/etc/aia/whitelist.txt"
/// user_directory = "/etc/aia/users"
/// api_port = 3200
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
    derive_new::new,
)]
#[setters(prefix = "with_", strip_option, into)]
pub struct UnitSettings {
    /// Directory for logs, conversation history and collected usernames
    #[serde(default)]
    #[new(default)]
    working_directory: PathBuf,

    /// Whitelist file with one administrator identifier per line
    #[serde(default)]
    #[new(default)]
    whitelist_location: Option<PathBuf>,

    /// Whether conversations are saved under the working directory
    #[serde(default)]
    #[new(default)]
    store_conversation_story: bool,

    /// Whether identifiers of new users are saved
    #[serde(default)]
    #[new(default)]
    store_new_usernames: bool,

    /// Whether the log is written to a file
    #[serde(default)]
    #[new(default)]
    store_logs: bool,

    /// Directory of action definitions
    #[serde(default)]
    #[new(default)]
    actions_directory: Option<PathBuf>,

    /// Whether inactive actions are hidden from command listings
    #[serde(default)]
    #[new(default)]
    hide_inactive_actions: bool,

    /// Port of the control API
    #[serde(default = "default_api_port")]
    #[new(value = "default_api_port()")]
    api_port: u16,

    /// Whether the control API is served
    #[serde(default)]
    #[new(default)]
    is_api_enabled: bool,

    /// Log file location
    #[serde(default)]
    #[new(default)]
    log_path: Option<PathBuf>,

    /// `KEY=VALUE` file exported into the process environment at bootstrap
    #[serde(default)]
    #[new(default)]
    env_path: Option<PathBuf>,

    /// Directory of per-user profile files
    #[serde(default)]
    #[new(default)]
    user_directory: Option<PathBuf>,

    /// Whether per-user profiles are loaded on reload
    #[serde(default = "default_use_user_configuration")]
    #[new(value = "default_use_user_configuration()")]
    use_user_configuration: bool,

    /// Extension of profile files, without the dot
    #[serde(default = "default_profile_extension")]
    #[new(value = "default_profile_extension()")]
    profile_extension: String,
}

fn default_api_port() -> u16 {
    3200
}

fn default_use_user_configuration() -> bool {
    true
}

fn default_profile_extension() -> String {
    DEFAULT_PROFILE_EXTENSION.to_string()
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitSettings {
    /// Load settings from a TOML file.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> AiaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        let settings = toml::from_str(&content).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        tracing::debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Render the settings for the admin info command.
    pub fn describe(&self) -> String {
        let whitelist = self
            .whitelist_location
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| WHITELIST_NOT_SET.to_string());
        let actions = self
            .actions_directory
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();

        format!(
            "⚙️ *Bot working directory:*\n```\n{}\n```\n\
             ⚙️ *Whitelist path:*\n```\n{}\n```\n\
             ⚙️ *Store conversation history:* `{}`\n\
             ⚙️ *Store new user identifiers:* `{}`\n\
             ⚙️ *Write log to file:* `{}`\n\
             ⚙️ *Bot actions directory:*\n```\n{}\n```\n\
             ⚙️ *API enabled:* `{}`\n\
             ⚙️ *API port:* `{}`",
            self.working_directory.display(),
            whitelist,
            self.store_conversation_story,
            self.store_new_usernames,
            self.store_logs,
            actions,
            self.is_api_enabled,
            self.api_port,
        )
    }
}
