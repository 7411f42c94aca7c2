//! Reloadable access control for the Aia bot.
//!
//! The [`ConfigurationUnit`] owns two stores:
//!
//! - [`WhitelistStore`] reads the administrator whitelist, one numeric
//!   identifier per line.
//! - [`UserProfileStore`] reads one JSON profile per user from a directory and
//!   checks every listed keyword against the bot's [`CommandRegistry`](aia_core::CommandRegistry).
//!
//! Loads never abort the bot. Bad records are skipped and logged, and a load
//! that yields nothing keeps the last configuration that worked. Readers see
//! an immutable [`ConfigurationState`] snapshot that a reload replaces in one
//! step.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod env;
mod profile;
mod settings;
mod state;
mod unit;
mod whitelist;

pub use env::{EnvExport, export_env_vars};
pub use profile::{
    DEFAULT_PROFILE_EXTENSION, ProfileLoad, ProfileMap, UserProfile, UserProfileStore,
};
pub use settings::{UnitSettings, WHITELIST_NOT_SET};
pub use state::{CommandAccess, ConfigurationState};
pub use unit::{ConfigurationUnit, PartOutcome, ReloadOutcome};
pub use whitelist::{EMPTY_WHITELIST_MESSAGE, Whitelist, WhitelistLoad, WhitelistStore};

pub(crate) fn display(path: &std::path::Path) -> String {
    path.display().to_string()
}

/// File text without a leading UTF-8 byte order mark.
pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}
