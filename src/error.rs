//! Domain-specific error types for the profile store.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library code returns typed errors ([`ProfileError`], [`ConfigError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ProfileError                 : every ProfileStore operation
//! ├── StoreUnavailable         : file locked, path invalid, permission denied
//! ├── OversizedPayload         : growing-buffer probe hit its ceiling
//! ├── InvalidName/InvalidValue : input the INI format cannot represent
//! ├── InvalidPath              : path could not be made absolute
//! └── UnsupportedBackend       : backend not available on this platform
//!
//! ConfigError                  : settings file loading and validation
//! ```
//!
//! An absent section or key is deliberately **not** an error: reads return an
//! empty string and callers use the existence checks instead.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results produced by store operations.
pub type Result<T, E = ProfileError> = std::result::Result<T, E>;

/// Which kind of name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A section header name.
    Section,
    /// An entry key.
    Key,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Section => write!(f, "section"),
            Self::Key => write!(f, "key"),
        }
    }
}

/// Errors raised by [`ProfileStore`](crate::store::ProfileStore) and its backends.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The backing file could not be read or written.
    #[error("profile store unavailable at {}: {source}", path.display())]
    StoreUnavailable {
        /// Absolute path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A value or name list did not fit even at the maximum buffer size.
    #[error("payload does not fit in the maximum buffer of {limit} code units")]
    OversizedPayload {
        /// The buffer ceiling, in UTF-16 code units.
        limit: usize,
    },

    /// A section or key name cannot be stored in an INI file.
    #[error("invalid {kind} name '{name}': {reason}")]
    InvalidName {
        /// Whether the name is a section or a key.
        kind: NameKind,
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// A value cannot be stored in an INI file.
    #[error("invalid value: {reason}")]
    InvalidValue {
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The store path could not be resolved to an absolute path.
    #[error("invalid store path '{}': {reason}", path.display())]
    InvalidPath {
        /// The path as supplied by the caller.
        path: PathBuf,
        /// Why the path could not be resolved.
        reason: String,
    },

    /// The selected backend does not exist on the current platform.
    #[error("backend '{backend}' is not supported on {platform}")]
    UnsupportedBackend {
        /// Backend name (e.g. `"native"`).
        backend: String,
        /// Name of the current platform (e.g. `"linux"`).
        platform: String,
    },
}

impl ProfileError {
    /// Wrap an I/O error for the store at `path`.
    #[must_use]
    pub fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Errors that arise from loading and validating the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the settings file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or does not match the schema.
    #[error("Invalid TOML in {path}: {message}")]
    Parse {
        /// Path to the offending file.
        path: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The settings parsed but contain inconsistent values.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
