//! Configuration error types.

/// Kinds of settings-file errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// Settings file could not be read
    #[display("Failed to read {}: {}", path, reason)]
    Read {
        /// Settings file path
        path: String,
        /// I/O message
        reason: String,
    },
    /// Settings file is not valid TOML for the expected shape
    #[display("Failed to parse {}: {}", path, reason)]
    Parse {
        /// Settings file path
        path: String,
        /// Parser message
        reason: String,
    },
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use aia_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Read {
///     path: "aia.toml".to_string(),
///     reason: "not found".to_string(),
/// });
/// assert!(err.to_string().contains("Failed to read aia.toml"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
