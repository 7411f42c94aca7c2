//! Normalized identifiers.
//!
//! Command keywords and user identifiers are compared case-insensitively. Both
//! are trimmed and lowercased once when constructed, so every later comparison
//! is a plain string equality.

use serde::{Deserialize, Serialize};

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A command keyword in canonical (trimmed, lowercase) form.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Normalize a raw keyword.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize(raw.as_ref()))
    }

    /// Canonical text of the keyword.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing but whitespace was given.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Keyword {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Keyword {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<Keyword> for String {
    fn from(keyword: Keyword) -> Self {
        keyword.0
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A chat user identifier in canonical form.
///
/// Telegram hands out numeric identifiers, but profile files store them as text,
/// so the canonical form is the trimmed, lowercased string.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Normalize a raw identifier.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize(raw.as_ref()))
    }

    /// Canonical text of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing but whitespace was given.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for UserId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for UserId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<UserId> for String {
    fn from(user_id: UserId) -> Self {
        user_id.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
