//! Reloadable configuration unit.

use crate::env::export_env_vars;
use crate::profile::UserProfileStore;
use crate::settings::UnitSettings;
use crate::state::{CommandAccess, ConfigurationState};
use crate::whitelist::WhitelistStore;
use aia_core::{CommandRegistry, Keyword, UserId};
use aia_error::{AccessError, AccessErrorKind};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// What a reload did with one part of the configuration.
#[derive(Debug, Clone)]
pub enum PartOutcome {
    /// The part was replaced with freshly loaded contents
    Replaced {
        /// Entries in the new contents
        count: usize,
    },
    /// The previous contents were kept
    Retained {
        /// Why the load was not applied
        reason: AccessError,
    },
    /// Loading this part is switched off in the settings
    Disabled,
}

impl PartOutcome {
    /// Whether new contents were published.
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

/// Result of [`ConfigurationUnit::reload`].
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct ReloadOutcome {
    /// Whitelist part
    whitelist: PartOutcome,
    /// User profile part
    profiles: PartOutcome,
    /// Generation visible to readers after the reload
    generation: u64,
}

impl ReloadOutcome {
    /// Whether any part was replaced.
    pub fn changed(&self) -> bool {
        self.whitelist.is_replaced() || self.profiles.is_replaced()
    }
}

/// Owns the whitelist and profile stores and serves access checks.
///
/// Readers get the current [`ConfigurationState`] snapshot; the read lock is
/// held only long enough to clone an `Arc`. Reloads are serialized and do all
/// file I/O before briefly taking the write lock to publish.
#[derive(Debug)]
pub struct ConfigurationUnit {
    settings: UnitSettings,
    state: RwLock<Arc<ConfigurationState>>,
    reload_guard: Mutex<()>,
}

impl ConfigurationUnit {
    /// Create a unit with an empty configuration. Nothing is read until [`reload`](Self::reload).
    pub fn new(settings: UnitSettings) -> Self {
        Self {
            settings,
            state: RwLock::new(Arc::new(ConfigurationState::default())),
            reload_guard: Mutex::new(()),
        }
    }

    /// Create a unit, export the env file if one is configured, and load everything.
    #[instrument(skip_all)]
    pub fn bootstrap<R: CommandRegistry + ?Sized>(
        settings: UnitSettings,
        registry: &R,
    ) -> (Self, ReloadOutcome) {
        if let Some(env_path) = settings.env_path() {
            if let Err(e) = export_env_vars(env_path) {
                warn!(error = %e.kind, "Environment export skipped");
            }
        }
        let unit = Self::new(settings);
        let outcome = unit.reload(registry);
        (unit, outcome)
    }

    /// Settings the unit was created with.
    pub fn settings(&self) -> &UnitSettings {
        &self.settings
    }

    /// The configuration currently visible to readers.
    pub fn snapshot(&self) -> Arc<ConfigurationState> {
        Arc::clone(&self.state.read())
    }

    /// Re-read the whitelist and user profiles and publish the result.
    ///
    /// The two parts load independently. A part that fails keeps its previous
    /// contents. Concurrent calls wait for the reload in flight to finish.
    #[instrument(skip_all)]
    pub fn reload<R: CommandRegistry + ?Sized>(&self, registry: &R) -> ReloadOutcome {
        let _guard = self.reload_guard.lock();
        let current = self.snapshot();
        let mut next = current.next_generation();

        let whitelist = match self.whitelist_store() {
            Ok(store) => match store.load(current.whitelist()) {
                Ok(load) => {
                    let whitelist = load.into_whitelist();
                    let count = whitelist.len();
                    next = next.with_whitelist(whitelist);
                    PartOutcome::Replaced { count }
                }
                Err(reason) => retained("whitelist", reason),
            },
            Err(reason) => retained("whitelist", reason),
        };

        let profiles = if !*self.settings.use_user_configuration() {
            info!("User configuration disabled, profiles not reloaded");
            PartOutcome::Disabled
        } else {
            match self.profile_store() {
                Ok(store) => match store.load(registry) {
                    Ok(load) => {
                        let profiles = load.into_profiles();
                        let count = profiles.len();
                        next = next.with_profiles(profiles);
                        PartOutcome::Replaced { count }
                    }
                    Err(reason) => retained("profiles", reason),
                },
                Err(reason) => retained("profiles", reason),
            }
        };

        let generation = if whitelist.is_replaced() || profiles.is_replaced() {
            let generation = *next.generation();
            *self.state.write() = Arc::new(next);
            info!(generation, "Configuration published");
            generation
        } else {
            *current.generation()
        };

        ReloadOutcome {
            whitelist,
            profiles,
            generation,
        }
    }

    /// Whether the identifier is on the administrator whitelist.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.snapshot().is_admin(user_id)
    }

    /// The user's explicit entry for a keyword, if any.
    pub fn command_access(
        &self,
        user_id: impl Into<UserId>,
        keyword: impl Into<Keyword>,
    ) -> CommandAccess {
        self.snapshot().command_access(&user_id.into(), &keyword.into())
    }

    /// Whether the user's profile explicitly allows the keyword.
    ///
    /// This is `false` for users without a profile, who have no per-user
    /// restriction at all. Dispatch that should let those users through must
    /// call [`command_access`](Self::command_access) and treat
    /// [`CommandAccess::Unrestricted`] as allowed; checking only this bool
    /// denies every unconfigured user.
    pub fn is_command_allowed_for_user(
        &self,
        user_id: impl Into<UserId>,
        keyword: impl Into<Keyword>,
    ) -> bool {
        self.command_access(user_id, keyword) == CommandAccess::Allowed
    }

    /// Render the whitelist for the admin status command.
    pub fn describe_whitelist(&self) -> String {
        self.snapshot().whitelist().describe()
    }

    /// Render the settings for the admin info command.
    pub fn describe_configuration(&self) -> String {
        self.settings.describe()
    }

    fn whitelist_store(&self) -> Result<WhitelistStore, AccessError> {
        self.settings
            .whitelist_location()
            .as_ref()
            .map(WhitelistStore::new)
            .ok_or_else(|| {
                AccessError::new(AccessErrorKind::MissingInput {
                    path: "(not configured)".to_string(),
                    reason: "whitelist location not configured, admin commands disabled"
                        .to_string(),
                })
            })
    }

    fn profile_store(&self) -> Result<UserProfileStore, AccessError> {
        self.settings
            .user_directory()
            .as_ref()
            .map(|directory| {
                UserProfileStore::new(directory)
                    .with_extension(self.settings.profile_extension().as_str())
            })
            .ok_or_else(|| {
                AccessError::new(AccessErrorKind::MissingInput {
                    path: "(not configured)".to_string(),
                    reason: "user directory not configured".to_string(),
                })
            })
    }
}

fn retained(part: &'static str, reason: AccessError) -> PartOutcome {
    if reason.kind().is_missing_input() {
        warn!(part, error = %reason.kind, "Keeping previous configuration");
    } else {
        error!(part, error = %reason.kind, "Keeping previous configuration");
    }
    PartOutcome::Retained { reason }
}
