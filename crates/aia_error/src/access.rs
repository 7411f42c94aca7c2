//! Access-control load error types.

/// Kinds of failures met while loading the whitelist, user profiles or env file.
///
/// None of these are fatal. Item-level kinds skip one record, load-level kinds
/// leave the previously published configuration in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AccessErrorKind {
    /// A file or directory the load depends on is absent or not configured
    #[display("Missing input {}: {}", path, reason)]
    MissingInput {
        /// Path that was expected (empty when not configured)
        path: String,
        /// What the absence means for the running bot
        reason: String,
    },
    /// A record could not be read or parsed
    #[display("Malformed record in {}: {}", path, reason)]
    MalformedRecord {
        /// File containing the record
        path: String,
        /// Parser or validation message
        reason: String,
    },
    /// A user identifier was already claimed by an earlier file
    #[display("Duplicate user {} in {}", user_id, path)]
    Conflict {
        /// File that was skipped
        path: String,
        /// Identifier claimed twice
        user_id: String,
    },
    /// A profile keyword names no known command
    #[display("Unknown command '{}' for user {}", keyword, user_id)]
    ReferentialMismatch {
        /// Owner of the profile
        user_id: String,
        /// Keyword that was removed
        keyword: String,
    },
    /// A load pass accepted zero records
    #[display("Nothing loaded from {}: {}", path, reason)]
    TotalLoadFailure {
        /// File or directory that was loaded
        path: String,
        /// Why nothing was accepted
        reason: String,
    },
}

impl AccessErrorKind {
    /// Whether this kind describes absent input rather than bad input.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput { .. })
    }
}

/// Access-control error with location tracking.
///
/// # Examples
///
/// ```
/// use aia_error::{AccessError, AccessErrorKind};
///
/// let err = AccessError::new(AccessErrorKind::Conflict {
///     path: "users/b.json".to_string(),
///     user_id: "7".to_string(),
/// });
/// assert!(format!("{}", err).contains("Duplicate user 7"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Access Error: {} at line {} in {}", kind, line, file)]
pub struct AccessError {
    /// The kind of error that occurred
    pub kind: AccessErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AccessError {
    /// Create a new access error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AccessErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AccessErrorKind {
        &self.kind
    }
}

/// Result type for access-control loads.
pub type AccessResult<T> = std::result::Result<T, AccessError>;
