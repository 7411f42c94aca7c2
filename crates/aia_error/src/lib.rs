//! Error types for the Aia bot configuration unit.
//!
//! Every error records the source location where it was created. Domain errors
//! convert into [`AiaError`] through the blanket `From` implementation.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod access;
mod config;

pub use access::{AccessError, AccessErrorKind, AccessResult};
pub use config::{ConfigError, ConfigErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum AiaErrorKind {
    /// Access-control load error
    #[display("{_0}")]
    Access(AccessError),
    /// Settings error
    #[display("{_0}")]
    Config(ConfigError),
}

/// Aia error with kind discrimination.
#[derive(Debug)]
pub struct AiaError(Box<AiaErrorKind>);

impl AiaError {
    /// Create a new error from a kind.
    pub fn new(kind: AiaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AiaErrorKind {
        &self.0
    }
}

impl std::fmt::Display for AiaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aia Error: {}", self.0)
    }
}

impl std::error::Error for AiaError {}

impl<T> From<T> for AiaError
where
    T: Into<AiaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Aia operations.
pub type AiaResult<T> = std::result::Result<T, AiaError>;
