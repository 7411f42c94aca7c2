//! Per-user command profiles.
//!
//! Each JSON file under the user directory declares one user and the command
//! keywords that user may invoke:
//!
//! ```json
//! { "UserID": "42", "ActiveCommands": ["ping", "status"] }
//! ```
//!
//! Field names are matched case-insensitively and unknown fields are ignored.

use crate::{display, strip_bom};
use aia_core::{CommandRegistry, Keyword, UserId};
use aia_error::{AccessError, AccessErrorKind, AccessResult};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};
use walkdir::WalkDir;

/// Default extension of profile files.
pub const DEFAULT_PROFILE_EXTENSION: &str = "json";

/// Profiles keyed by user.
pub type ProfileMap = HashMap<UserId, UserProfile>;

/// Commands a single user may invoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct UserProfile {
    /// Owner of the profile
    user_id: UserId,
    /// Permitted keywords, in file order without duplicates
    active_commands: Vec<Keyword>,
}

impl UserProfile {
    /// Create a profile, dropping repeated keywords.
    pub fn new(
        user_id: impl Into<UserId>,
        active_commands: impl IntoIterator<Item = Keyword>,
    ) -> Self {
        let mut seen = HashSet::new();
        let active_commands = active_commands
            .into_iter()
            .filter(|keyword| seen.insert(keyword.clone()))
            .collect();
        Self {
            user_id: user_id.into(),
            active_commands,
        }
    }

    /// Whether the profile lists the keyword.
    pub fn allows(&self, keyword: &Keyword) -> bool {
        self.active_commands.contains(keyword)
    }
}

/// On-disk shape of a profile file.
#[derive(Debug, Default)]
struct ProfileDocument {
    user_id: Option<String>,
    active_commands: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserIdField {
    Text(String),
    Number(i64),
}

impl From<UserIdField> for String {
    fn from(field: UserIdField) -> Self {
        match field {
            UserIdField::Text(text) => text,
            UserIdField::Number(number) => number.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for ProfileDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProfileDocumentVisitor)
    }
}

struct ProfileDocumentVisitor;

impl<'de> Visitor<'de> for ProfileDocumentVisitor {
    type Value = ProfileDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a user profile object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut document = ProfileDocument::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.to_ascii_lowercase().as_str() {
                "userid" => {
                    document.user_id = map.next_value::<Option<UserIdField>>()?.map(String::from);
                }
                // older profiles carry the misspelled field name
                "activecommands" | "activecomands" => {
                    document.active_commands = map.next_value()?;
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(document)
    }
}

/// Keywords a profile may reference. `None` accepts everything.
struct KnownKeywords(Option<HashSet<Keyword>>);

impl KnownKeywords {
    fn from_registry<R: CommandRegistry + ?Sized>(registry: &R) -> Self {
        if registry.is_empty() {
            return Self(None);
        }
        Self(Some(
            registry
                .commands()
                .iter()
                .map(|command| command.keyword().clone())
                .collect(),
        ))
    }

    fn accepts(&self, keyword: &Keyword) -> bool {
        self.0.as_ref().is_none_or(|known| known.contains(keyword))
    }
}

/// Result of a profile directory load that accepted at least one profile.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct ProfileLoad {
    /// Accepted profiles
    profiles: ProfileMap,
    /// Number of profile files found
    files_seen: usize,
    /// Skipped files and removed keywords
    issues: Vec<AccessError>,
}

impl ProfileLoad {
    /// Take the accepted profiles.
    pub fn into_profiles(self) -> ProfileMap {
        self.profiles
    }
}

/// Loads user profiles from a directory tree.
#[derive(Debug, Clone, derive_getters::Getters, derive_new::new)]
pub struct UserProfileStore {
    /// Root directory searched recursively
    #[new(into)]
    directory: PathBuf,
    /// Extension of profile files, without the dot
    #[new(value = "DEFAULT_PROFILE_EXTENSION.to_string()")]
    extension: String,
}

impl UserProfileStore {
    /// Use a different profile file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Read every profile file and validate it against the registry.
    ///
    /// Bad files are skipped individually. An error means not a single profile
    /// was accepted and the caller should keep the profiles it has.
    #[instrument(skip(self, registry), fields(directory = %self.directory.display()))]
    pub fn load<R: CommandRegistry + ?Sized>(&self, registry: &R) -> AccessResult<ProfileLoad> {
        if !self.directory.is_dir() {
            warn!("Cannot read user profiles, directory does not exist");
            return Err(AccessError::new(AccessErrorKind::MissingInput {
                path: display(&self.directory),
                reason: "user profile directory does not exist".to_string(),
            }));
        }

        let files = self.profile_files();
        if files.is_empty() {
            error!(extension = %self.extension, "No profile files found");
            return Err(AccessError::new(AccessErrorKind::TotalLoadFailure {
                path: display(&self.directory),
                reason: format!("no .{} files found", self.extension),
            }));
        }

        let known = KnownKeywords::from_registry(registry);
        let mut profiles = ProfileMap::new();
        let mut issues = Vec::new();

        for path in &files {
            let profile = match self.read_profile(path) {
                Ok(profile) => profile,
                Err(e) => {
                    error!(path = %path.display(), error = %e.kind, "Profile file skipped");
                    issues.push(e);
                    continue;
                }
            };

            if profiles.contains_key(profile.user_id()) {
                error!(
                    path = %path.display(),
                    user_id = %profile.user_id(),
                    "Profile file skipped, user was already added"
                );
                issues.push(AccessError::new(AccessErrorKind::Conflict {
                    path: display(path),
                    user_id: profile.user_id().to_string(),
                }));
                continue;
            }

            let profile = filter_keywords(profile, &known, &mut issues);
            // A profile emptied by filtering is still accepted; only files that
            // declare no commands at all are rejected.
            if profile.active_commands().is_empty() {
                warn!(
                    user_id = %profile.user_id(),
                    "No declared command exists in the registry, user keeps an empty profile"
                );
            }
            info!(
                user_id = %profile.user_id(),
                commands = profile.active_commands().len(),
                "Added user profile"
            );
            profiles.insert(profile.user_id().clone(), profile);
        }

        if profiles.is_empty() {
            error!(files = files.len(), "No user profile could be applied");
            return Err(AccessError::new(AccessErrorKind::TotalLoadFailure {
                path: display(&self.directory),
                reason: format!("none of {} profile files was accepted", files.len()),
            }));
        }

        info!(
            accepted = profiles.len(),
            files = files.len(),
            issues = issues.len(),
            "User profiles loaded"
        );
        Ok(ProfileLoad {
            profiles,
            files_seen: files.len(),
            issues,
        })
    }

    /// Profile files under the directory, symlinks followed, sorted by path.
    fn profile_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.directory)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.has_profile_extension(path))
            .collect();
        // Whole-path byte order, so `a-b.json` comes before `a/b.json`.
        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        debug!(count = files.len(), "Enumerated profile files");
        files
    }

    fn has_profile_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    fn read_profile(&self, path: &Path) -> AccessResult<UserProfile> {
        let malformed = |reason: String| {
            AccessError::new(AccessErrorKind::MalformedRecord {
                path: display(path),
                reason,
            })
        };

        let content = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        let document: ProfileDocument =
            serde_json::from_str(strip_bom(&content)).map_err(|e| malformed(e.to_string()))?;

        let user_id = document
            .user_id
            .map(UserId::new)
            .filter(|user_id| !user_id.is_blank())
            .ok_or_else(|| malformed("missing UserID".to_string()))?;

        let commands = match document.active_commands {
            Some(commands) if !commands.is_empty() => commands,
            _ => {
                return Err(malformed(format!(
                    "user {} has an empty command list",
                    user_id
                )));
            }
        };

        let keywords = commands.into_iter().map(Keyword::new).filter(|keyword| {
            if keyword.is_blank() {
                warn!(path = %path.display(), "Blank command keyword ignored");
            }
            !keyword.is_blank()
        });
        Ok(UserProfile::new(user_id, keywords))
    }
}

/// Drop keywords the registry does not know, recording each removal.
fn filter_keywords(
    profile: UserProfile,
    known: &KnownKeywords,
    issues: &mut Vec<AccessError>,
) -> UserProfile {
    let UserProfile {
        user_id,
        active_commands,
    } = profile;
    let (kept, dropped): (Vec<Keyword>, Vec<Keyword>) = active_commands
        .into_iter()
        .partition(|keyword| known.accepts(keyword));

    for keyword in dropped {
        warn!(
            user_id = %user_id,
            keyword = %keyword,
            "Cannot grant command to user, command not found in registry"
        );
        issues.push(AccessError::new(AccessErrorKind::ReferentialMismatch {
            user_id: user_id.to_string(),
            keyword: keyword.to_string(),
        }));
    }

    UserProfile {
        user_id,
        active_commands: kept,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aia_core::Command;

    #[test]
    fn test_document_field_names_case_insensitive() {
        let document: ProfileDocument =
            serde_json::from_str(r#"{"userid": "9", "ACTIVECOMMANDS": ["a"], "Note": 1}"#)
                .unwrap();
        assert_eq!(document.user_id.as_deref(), Some("9"));
        assert_eq!(document.active_commands, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_document_numeric_user_id() {
        let document: ProfileDocument =
            serde_json::from_str(r#"{"UserID": 42, "ActiveComands": ["a"]}"#).unwrap();
        assert_eq!(document.user_id.as_deref(), Some("42"));
        assert!(document.active_commands.is_some());
    }

    #[test]
    fn test_document_rejects_non_object() {
        assert!(serde_json::from_str::<ProfileDocument>("[1, 2]").is_err());
        assert!(serde_json::from_str::<ProfileDocument>("null").is_err());
    }

    #[test]
    fn test_profile_dedupes_keywords() {
        let profile = UserProfile::new("1", ["a", "A ", "b"].map(Keyword::new));
        assert_eq!(profile.active_commands().len(), 2);
        assert!(profile.allows(&Keyword::new("B")));
    }

    #[test]
    fn test_filter_keywords_against_registry() {
        let registry = [Command::new("ping", true), Command::new("pong", false)];
        let known = KnownKeywords::from_registry(&registry);
        let mut issues = Vec::new();

        let profile = UserProfile::new("42", ["PING", "unknown"].map(Keyword::new));
        let profile = filter_keywords(profile, &known, &mut issues);

        assert_eq!(profile.active_commands(), &vec![Keyword::new("ping")]);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0].kind(),
            AccessErrorKind::ReferentialMismatch { .. }
        ));
    }

    #[test]
    fn test_empty_registry_accepts_everything() {
        let registry: Vec<Command> = Vec::new();
        let known = KnownKeywords::from_registry(&registry);
        assert!(known.accepts(&Keyword::new("anything")));
    }
}
