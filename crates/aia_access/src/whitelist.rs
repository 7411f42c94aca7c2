//! Administrator whitelist.

use crate::{display, strip_bom};
use aia_error::{AccessError, AccessErrorKind, AccessResult};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, warn};

/// Text rendered when no administrator is configured.
pub const EMPTY_WHITELIST_MESSAGE: &str = "whitelist empty, admin commands disabled";

/// Ordered set of administrator identifiers.
///
/// Entries keep their load order for rendering; membership checks go through a
/// hash index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: Vec<i64>,
    index: HashSet<i64>,
}

impl Whitelist {
    /// Create an empty whitelist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier. Returns false if it was already present.
    pub fn insert(&mut self, user_id: i64) -> bool {
        if !self.index.insert(user_id) {
            return false;
        }
        self.entries.push(user_id);
        true
    }

    /// Whether the identifier is an administrator.
    pub fn contains(&self, user_id: i64) -> bool {
        self.index.contains(&user_id)
    }

    /// Identifiers in load order.
    pub fn entries(&self) -> &[i64] {
        &self.entries
    }

    /// Number of administrators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no administrator is configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the whitelist for the admin status command.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return EMPTY_WHITELIST_MESSAGE.to_string();
        }
        let mut out = String::from("Bot whitelist:\n");
        for user_id in &self.entries {
            out.push_str(&format!("- `{}`\n", user_id));
        }
        out
    }
}

impl FromIterator<i64> for Whitelist {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut whitelist = Self::new();
        for user_id in iter {
            whitelist.insert(user_id);
        }
        whitelist
    }
}

/// Result of a successful whitelist load.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct WhitelistLoad {
    /// Accepted identifiers
    whitelist: Whitelist,
    /// Lines that were dropped
    rejected: Vec<AccessError>,
}

impl WhitelistLoad {
    /// Take the accepted whitelist.
    pub fn into_whitelist(self) -> Whitelist {
        self.whitelist
    }
}

/// Loads the whitelist from a line-oriented file.
#[derive(Debug, Clone, derive_getters::Getters, derive_new::new)]
pub struct WhitelistStore {
    /// Whitelist file location
    #[new(into)]
    path: PathBuf,
}

impl WhitelistStore {
    /// Read and validate the whitelist file.
    ///
    /// `current` is the whitelist in effect; it is only used for the summary log.
    /// An error means the caller should keep `current`.
    #[instrument(skip(self, current), fields(path = %self.path.display()))]
    pub fn load(&self, current: &Whitelist) -> AccessResult<WhitelistLoad> {
        if !self.path.is_file() {
            warn!("Whitelist file not found, admin commands will not be processed");
            return Err(AccessError::new(AccessErrorKind::MissingInput {
                path: display(&self.path),
                reason: "whitelist file does not exist".to_string(),
            }));
        }

        info!("Updating whitelist");
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            error!(error = %e, "Failed to read whitelist file");
            AccessError::new(AccessErrorKind::MalformedRecord {
                path: display(&self.path),
                reason: e.to_string(),
            })
        })?;

        let mut whitelist = Whitelist::new();
        let mut rejected = Vec::new();
        for (number, line) in strip_bom(&content).lines().enumerate() {
            let candidate = line.trim();
            if candidate.is_empty() {
                continue;
            }
            match candidate.parse::<i64>() {
                Ok(user_id) if whitelist.insert(user_id) => {
                    info!(user_id, "Added whitelisted user");
                }
                Ok(user_id) => {
                    warn!(user_id, line = number + 1, "Duplicate whitelist entry skipped");
                    rejected.push(self.rejection(number, candidate, "duplicate identifier"));
                }
                Err(e) => {
                    warn!(
                        entry = candidate,
                        line = number + 1,
                        "Whitelist entry skipped (non-numeric identifier)"
                    );
                    rejected.push(self.rejection(number, candidate, &e.to_string()));
                }
            }
        }

        if whitelist.is_empty() {
            error!(
                rejected = rejected.len(),
                "Whitelist update failed, file contains no valid identifiers"
            );
            return Err(AccessError::new(AccessErrorKind::TotalLoadFailure {
                path: display(&self.path),
                reason: "no numeric identifiers found".to_string(),
            }));
        }

        info!(
            before = current.len(),
            after = whitelist.len(),
            rejected = rejected.len(),
            "Whitelist updated"
        );
        Ok(WhitelistLoad {
            whitelist,
            rejected,
        })
    }

    #[track_caller]
    fn rejection(&self, number: usize, entry: &str, reason: &str) -> AccessError {
        debug!(entry, reason, "Recording rejected whitelist entry");
        AccessError::new(AccessErrorKind::MalformedRecord {
            path: format!("{}:{}", self.path.display(), number + 1),
            reason: format!("'{}': {}", entry, reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut whitelist = Whitelist::new();
        assert!(whitelist.insert(3));
        assert!(whitelist.insert(1));
        assert!(!whitelist.insert(3));
        assert_eq!(whitelist.entries(), &[3, 1]);
        assert!(whitelist.contains(1));
        assert!(!whitelist.contains(2));
    }

    #[test]
    fn test_describe_empty() {
        assert_eq!(Whitelist::new().describe(), EMPTY_WHITELIST_MESSAGE);
    }

    #[test]
    fn test_describe_lists_entries_in_order() {
        let whitelist: Whitelist = [222, 111].into_iter().collect();
        assert_eq!(whitelist.describe(), "Bot whitelist:\n- `222`\n- `111`\n");
    }
}
