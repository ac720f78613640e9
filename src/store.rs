//! Typed façade over a single INI profile file.
//!
//! A [`ProfileStore`] is bound to one absolute file path and routes every
//! operation through a [`ProfileBackend`]. It keeps no state of its own: each
//! call observes whatever is in the file at that moment, and every write goes
//! straight to the backend.
//!
//! Reads use the [growing-buffer probe](crate::probe::probe), so values and
//! name lists of any size come back complete or fail with
//! [`ProfileError::OversizedPayload`]; nothing is ever silently truncated.
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backend::ProfileBackend;
use crate::backend::file::IniFileBackend;
use crate::config::Settings;
use crate::error::{NameKind, ProfileError, Result};
use crate::paths;
use crate::platform::Platform;
use crate::probe::{self, BufferLimits, Payload};

/// Read/write access to the sections and entries of one INI file.
///
/// # Examples
///
/// ```
/// use profile_store::store::ProfileStore;
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = ProfileStore::open(dir.path().join("app.ini")).unwrap();
///
/// store.write_entry("Window", "Width", Some("640")).unwrap();
/// assert_eq!(store.entry_value("window", "width").unwrap(), "640");
/// assert!(store.section_exists("Window").unwrap());
///
/// store.delete_section("Window").unwrap();
/// assert!(!store.key_exists("Window", "Width").unwrap());
/// ```
pub struct ProfileStore {
    path: PathBuf,
    backend: Box<dyn ProfileBackend>,
    limits: BufferLimits,
}

impl fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileStore")
            .field("path", &self.path)
            .field("backend", &self.backend.name())
            .field("limits", &self.limits)
            .finish()
    }
}

impl ProfileStore {
    /// Open the INI file at `path` with the built-in file backend.
    ///
    /// The file does not need to exist yet; it is created by the first write.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidPath`] if `path` cannot be made absolute.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_backend(path, Box::new(IniFileBackend::new()))
    }

    /// Open the INI file at `path` through a caller-supplied backend.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidPath`] if `path` cannot be made absolute.
    pub fn with_backend(path: impl AsRef<Path>, backend: Box<dyn ProfileBackend>) -> Result<Self> {
        let path = paths::resolve(path)?;
        debug!(path = %path.display(), backend = backend.name(), "opening profile store");
        Ok(Self {
            path,
            backend,
            limits: BufferLimits::default(),
        })
    }

    /// Open the INI file at `path` with the backend and buffer limits chosen
    /// in `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidPath`] if `path` cannot be made absolute,
    /// or [`ProfileError::UnsupportedBackend`] if the configured backend does
    /// not exist on this platform.
    pub fn from_settings(path: impl AsRef<Path>, settings: &Settings) -> Result<Self> {
        let backend = settings.store.backend.create(&Platform::detect())?;
        Ok(Self::with_backend(path, backend)?.with_limits(settings.buffer.limits()))
    }

    /// Replace the buffer limits used by the growing-buffer probe.
    #[must_use]
    pub const fn with_limits(mut self, limits: BufferLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Absolute path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Buffer limits in effect.
    #[must_use]
    pub const fn limits(&self) -> &BufferLimits {
        &self.limits
    }

    /// Value of `key` in `section`, or `""` when either is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the file cannot be read,
    /// or [`ProfileError::OversizedPayload`] if the value exceeds the buffer
    /// ceiling.
    pub fn entry_value(&self, section: &str, key: &str) -> Result<String> {
        let units = probe::probe(&self.limits, Payload::Single, |buf| {
            self.backend.read_value(&self.path, section, key, "", buf)
        })?;
        Ok(probe::decode_single(&units))
    }

    /// Set `key` to `value` in `section`, creating the section if needed.
    ///
    /// A `None` value deletes the key.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidName`] or [`ProfileError::InvalidValue`]
    /// for input the INI format cannot hold, and
    /// [`ProfileError::StoreUnavailable`] if the file cannot be written.
    pub fn write_entry(&self, section: &str, key: &str, value: Option<&str>) -> Result<()> {
        validate_name(NameKind::Section, section)?;
        validate_name(NameKind::Key, key)?;
        if let Some(value) = value {
            validate_value(value)?;
        }
        self.backend
            .write_string(&self.path, section.trim(), Some(key.trim()), value)
    }

    /// Write every `(key, value)` pair into `section`, in order.
    ///
    /// Each pair goes through [`write_entry`](Self::write_entry), so a `None`
    /// value deletes that key. Each write is atomic on its own; the batch as
    /// a whole is not. If a pair fails, the pairs before it stay written.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`write_entry`](Self::write_entry).
    pub fn write_entries<I, K, V>(&self, section: &str, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in entries {
            self.write_entry(section, key.as_ref(), value.as_ref().map(AsRef::as_ref))?;
        }
        Ok(())
    }

    /// Delete `key` from `section`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the file cannot be written.
    pub fn delete_entry(&self, section: &str, key: &str) -> Result<()> {
        self.write_entry(section, key, None)
    }

    /// Delete `section` with all of its entries.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the file cannot be written.
    pub fn delete_section(&self, section: &str) -> Result<()> {
        validate_name(NameKind::Section, section)?;
        self.backend
            .write_string(&self.path, section.trim(), None, None)
    }

    /// `true` if `key` in `section` has a non-empty value.
    ///
    /// A key that is present with an empty value reports `false`: the
    /// profile API cannot tell "empty" from "absent".
    ///
    /// # Errors
    ///
    /// Propagates errors from [`entry_value`](Self::entry_value).
    pub fn key_exists(&self, section: &str, key: &str) -> Result<bool> {
        Ok(!self.entry_value(section, key)?.is_empty())
    }

    /// `true` if `section` is listed by [`section_names`](Self::section_names).
    ///
    /// The comparison is exact, so it only matches names spelled the way they
    /// appear in the file.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`section_names`](Self::section_names).
    pub fn section_exists(&self, section: &str) -> Result<bool> {
        Ok(self.section_names()?.iter().any(|name| name == section))
    }

    /// First section, in file order, whose `key` has exactly `value`.
    ///
    /// Stops at the first match.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying reads.
    pub fn find_section_by_key_and_value(&self, key: &str, value: &str) -> Result<Option<String>> {
        for section in self.section_names()? {
            if self.entry_value(&section, key)? == value {
                return Ok(Some(section));
            }
        }
        Ok(None)
    }

    /// All `(key, value)` pairs of `section`, in file order.
    ///
    /// Each value is read separately, so a file changed concurrently by
    /// someone else can yield a mix of old and new values.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying reads.
    pub fn entries(&self, section: &str) -> Result<Vec<(String, String)>> {
        self.entry_names(section)?
            .into_iter()
            .map(|key| {
                let value = self.entry_value(section, &key)?;
                Ok((key, value))
            })
            .collect()
    }

    /// Every section name, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the file cannot be read,
    /// or [`ProfileError::OversizedPayload`] if the list exceeds the ceiling.
    pub fn section_names(&self) -> Result<Vec<String>> {
        let units = probe::probe(&self.limits, Payload::MultiString, |buf| {
            self.backend.read_section_names(&self.path, buf)
        })?;
        Ok(probe::decode_multi(&units))
    }

    /// Key names of `section`, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the file cannot be read,
    /// or [`ProfileError::OversizedPayload`] if the list exceeds the ceiling.
    pub fn entry_names(&self, section: &str) -> Result<Vec<String>> {
        let units = probe::probe(&self.limits, Payload::MultiString, |buf| {
            self.backend.read_key_names(&self.path, section, buf)
        })?;
        Ok(probe::decode_multi(&units))
    }
}

/// Reject names that cannot be written as an INI header or key.
fn validate_name(kind: NameKind, name: &str) -> Result<()> {
    let invalid = |reason: &'static str| {
        Err(ProfileError::InvalidName {
            kind,
            name: name.to_string(),
            reason,
        })
    };
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return invalid("must not be empty");
    }
    if trimmed.contains(['\0', '\r', '\n']) {
        return invalid("must not contain NUL or line breaks");
    }
    match kind {
        NameKind::Section if trimmed.contains(']') => invalid("must not contain ']'"),
        NameKind::Key if trimmed.contains('=') => invalid("must not contain '='"),
        NameKind::Key if trimmed.starts_with([';', '#', '[']) => {
            invalid("must not start with ';', '#' or '['")
        }
        _ => Ok(()),
    }
}

fn validate_value(value: &str) -> Result<()> {
    if value.contains(['\0', '\r', '\n']) {
        return Err(ProfileError::InvalidValue {
            reason: "must not contain NUL or line breaks",
        });
    }
    Ok(())
}
