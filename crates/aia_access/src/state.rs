//! Published configuration snapshot.

use crate::profile::{ProfileMap, UserProfile};
use crate::whitelist::Whitelist;
use aia_core::{Keyword, UserId};

/// Answer to "what does this user's profile say about this keyword".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAccess {
    /// The user's profile lists the keyword
    Allowed,
    /// The user has a profile that does not list the keyword
    Denied,
    /// The user has no profile; the dispatcher applies its own defaults
    Unrestricted,
}

/// Whitelist and profiles as of one reload.
///
/// Snapshots are immutable once published. A reload builds the next one from
/// scratch and swaps it in whole.
#[derive(Debug, Clone, Default, derive_getters::Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct ConfigurationState {
    /// Administrator identifiers
    whitelist: Whitelist,
    /// Per-user command profiles
    profiles: ProfileMap,
    /// Number of reloads that changed anything
    #[setters(skip)]
    generation: u64,
}

impl ConfigurationState {
    /// The snapshot that follows this one.
    pub(crate) fn next_generation(&self) -> Self {
        Self {
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    /// Whether the identifier is an administrator.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.whitelist.contains(user_id)
    }

    /// Profile of a user, if one is configured.
    pub fn profile(&self, user_id: &UserId) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    /// Look up a user's explicit entry for a keyword.
    pub fn command_access(&self, user_id: &UserId, keyword: &Keyword) -> CommandAccess {
        match self.profile(user_id) {
            Some(profile) if profile.allows(keyword) => CommandAccess::Allowed,
            Some(_) => CommandAccess::Denied,
            None => CommandAccess::Unrestricted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ConfigurationState {
        let mut profiles = ProfileMap::new();
        profiles.insert(
            UserId::new("42"),
            UserProfile::new("42", [Keyword::new("ping")]),
        );
        ConfigurationState::default()
            .with_whitelist([111, 222].into_iter().collect())
            .with_profiles(profiles)
    }

    #[test]
    fn test_command_access_tri_state() {
        let state = state();
        let ping = Keyword::new("Ping");
        assert_eq!(
            state.command_access(&UserId::new("42"), &ping),
            CommandAccess::Allowed
        );
        assert_eq!(
            state.command_access(&UserId::new("42"), &Keyword::new("pong")),
            CommandAccess::Denied
        );
        assert_eq!(
            state.command_access(&UserId::new("7"), &ping),
            CommandAccess::Unrestricted
        );
    }

    #[test]
    fn test_next_generation_copies_contents() {
        let state = state();
        let next = state.next_generation();
        assert_eq!(*next.generation(), 1);
        assert!(next.is_admin(222));
        assert_eq!(next.profiles().len(), 1);
    }
}
