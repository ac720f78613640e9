//! Settings for the profile store front end.
//!
//! Settings come from an optional TOML file. Every field has a default, so a
//! missing file or a partial one is fine:
//!
//! ```toml
//! [store]
//! backend = "file"
//!
//! [buffer]
//! initial_value_capacity = 250
//! initial_list_capacity = 500
//! max_capacity = 16777216
//! ```
pub mod toml_loader;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::backend::BackendKind;
use crate::error::ConfigError;
use crate::probe::BufferLimits;

/// All settings read from the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Backend selection.
    pub store: StoreSettings,
    /// Growing-buffer probe limits.
    pub buffer: BufferSettings,
}

/// `[store]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    /// Which backend performs file access.
    pub backend: BackendKind,
}

/// `[buffer]` table, in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferSettings {
    /// First capacity tried for single values.
    pub initial_value_capacity: usize,
    /// First capacity tried for name lists.
    pub initial_list_capacity: usize,
    /// Ceiling for any single probe.
    pub max_capacity: usize,
}

impl Default for BufferSettings {
    fn default() -> Self {
        let limits = BufferLimits::default();
        Self {
            initial_value_capacity: limits.initial_value,
            initial_list_capacity: limits.initial_list,
            max_capacity: limits.max,
        }
    }
}

impl BufferSettings {
    /// Probe limits described by these settings.
    #[must_use]
    pub const fn limits(&self) -> BufferLimits {
        BufferLimits {
            initial_value: self.initial_value_capacity,
            initial_list: self.initial_list_capacity,
            max: self.max_capacity,
        }
    }
}

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// `--backend`
    pub backend: Option<BackendKind>,
    /// `--max-buffer`
    pub max_capacity: Option<usize>,
}

impl Settings {
    /// Load settings from `explicit` if given, otherwise from the default
    /// location, then apply `overrides` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or the
    /// resulting settings are inconsistent.
    pub fn load(explicit: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_path(),
        };
        let mut settings = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading settings");
                toml_loader::load_config::<Self>(&path)?
            }
            None => Self::default(),
        };
        settings.apply(overrides);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line overrides.
    pub const fn apply(&mut self, overrides: Overrides) {
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(max) = overrides.max_capacity {
            self.buffer.max_capacity = max;
        }
    }

    /// Check that the buffer capacities are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if any capacity is below
    /// [`BufferLimits::MIN_CAPACITY`] or an initial capacity exceeds the
    /// maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let buffer = &self.buffer;
        let min = BufferLimits::MIN_CAPACITY;
        for (name, value) in [
            ("initial_value_capacity", buffer.initial_value_capacity),
            ("initial_list_capacity", buffer.initial_list_capacity),
            ("max_capacity", buffer.max_capacity),
        ] {
            if value < min {
                return Err(ConfigError::Invalid(format!(
                    "buffer.{name} must be at least {min}, got {value}"
                )));
            }
            if value > buffer.max_capacity {
                return Err(ConfigError::Invalid(format!(
                    "buffer.{name} ({value}) exceeds buffer.max_capacity ({})",
                    buffer.max_capacity
                )));
            }
        }
        Ok(())
    }
}

/// Default settings file location.
///
/// `$XDG_CONFIG_HOME/profile-store/config.toml`, falling back to
/// `$HOME/.config/profile-store/config.toml`. `None` when neither variable
/// is set.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        })?;
    Some(base.join("profile-store").join("config.toml"))
}
