//! Backing store contract and its implementations.
//!
//! [`ProfileStore`](crate::store::ProfileStore) never touches a file itself.
//! It talks to a [`ProfileBackend`], which offers exactly the four primitives
//! of a classic profile API: read one value, enumerate the keys of a section,
//! enumerate the sections, and write (or delete) a string.
//!
//! - [`file::IniFileBackend`]: self-contained INI reader/writer (all platforms)
//! - [`native::NativeProfileBackend`]: the Win32 profile API (Windows only)
pub mod document;
pub mod file;
#[cfg(windows)]
pub mod native;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};
use crate::platform::Platform;

/// The four-primitive backing store contract.
///
/// All reads follow the `GetPrivateProfileStringW` buffer convention:
///
/// - a single value is copied truncated to `buf.len() - 1` units plus a NUL,
///   and the number of copied units is returned;
/// - a name list is written as `name\0name\0…\0` and the count excluding the
///   final NUL is returned; when it does not fit, it is cut short and
///   `buf.len() - 2` is returned.
///
/// Callers detect truncation from the returned count alone, which is what
/// the [growing-buffer probe](crate::probe::probe) relies on.
pub trait ProfileBackend {
    /// Copy the value of `key` in `section` into `buf`, or `default` when the
    /// key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the store cannot be read.
    fn read_value(
        &self,
        path: &Path,
        section: &str,
        key: &str,
        default: &str,
        buf: &mut [u16],
    ) -> Result<usize>;

    /// Copy the key names of `section` into `buf` as a multi-string.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the store cannot be read.
    fn read_key_names(&self, path: &Path, section: &str, buf: &mut [u16]) -> Result<usize>;

    /// Copy every section name into `buf` as a multi-string.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the store cannot be read.
    fn read_section_names(&self, path: &Path, buf: &mut [u16]) -> Result<usize>;

    /// Upsert `key = value` in `section`.
    ///
    /// A `None` value deletes the key; a `None` key deletes the whole section.
    /// Each call must be atomic from the caller's point of view.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the store cannot be written.
    fn write_string(
        &self,
        path: &Path,
        section: &str,
        key: Option<&str>,
        value: Option<&str>,
    ) -> Result<()>;

    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Built-in backend selector, as named in settings and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// [`file::IniFileBackend`].
    #[default]
    File,
    /// [`native::NativeProfileBackend`] (Windows only).
    Native,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Native => write!(f, "native"),
        }
    }
}

impl BackendKind {
    /// Instantiate the selected backend for `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::UnsupportedBackend`] when selecting the native
    /// backend anywhere but Windows.
    pub fn create(self, platform: &Platform) -> Result<Box<dyn ProfileBackend>> {
        match self {
            Self::File => Ok(Box::new(file::IniFileBackend::new())),
            Self::Native => native_backend(platform),
        }
    }
}

#[cfg(windows)]
#[allow(clippy::unnecessary_wraps)]
fn native_backend(_platform: &Platform) -> Result<Box<dyn ProfileBackend>> {
    Ok(Box::new(native::NativeProfileBackend))
}

#[cfg(not(windows))]
fn native_backend(platform: &Platform) -> Result<Box<dyn ProfileBackend>> {
    Err(ProfileError::UnsupportedBackend {
        backend: BackendKind::Native.to_string(),
        platform: platform.os.to_string(),
    })
}

/// Copy `units` into `buf` following the single-value convention.
///
/// Returns the number of units copied (excluding the NUL).
///
/// # Examples
///
/// ```
/// use profile_store::backend::fill_single;
///
/// let value: Vec<u16> = "abcdef".encode_utf16().collect();
/// let mut buf = [0u16; 4];
/// assert_eq!(fill_single(&value, &mut buf), 3); // truncated to len - 1
/// assert_eq!(buf[3], 0);
/// ```
#[must_use]
pub fn fill_single(units: &[u16], buf: &mut [u16]) -> usize {
    let Some(room) = buf.len().checked_sub(1) else {
        return 0;
    };
    let n = units.len().min(room);
    for (dst, src) in buf.iter_mut().zip(units.iter().take(n)) {
        *dst = *src;
    }
    if let Some(terminator) = buf.get_mut(n) {
        *terminator = 0;
    }
    n
}

/// Copy `names` into `buf` following the multi-string convention.
///
/// Returns the number of units written excluding the final NUL, or
/// `buf.len() - 2` when the list had to be truncated.
///
/// # Examples
///
/// ```
/// use profile_store::backend::fill_multi;
///
/// let mut buf = [0u16; 16];
/// let n = fill_multi(["ab", "c"], &mut buf);
/// assert_eq!(n, 5); // "ab\0c\0"
///
/// let mut small = [0u16; 4];
/// assert_eq!(fill_multi(["abcdef"], &mut small), 2);
/// ```
pub fn fill_multi<'a, I>(names: I, buf: &mut [u16]) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let cap = buf.len();
    if cap < 2 {
        if let Some(first) = buf.first_mut() {
            *first = 0;
        }
        return 0;
    }
    let room = cap - 2;
    let mut pos = 0;
    for name in names {
        for unit in name.encode_utf16().chain(std::iter::once(0)) {
            if pos == room {
                // Truncated: close the list with a double NUL in the reserved tail.
                if let Some(tail) = buf.get_mut(room..) {
                    tail.fill(0);
                }
                return room;
            }
            if let Some(slot) = buf.get_mut(pos) {
                *slot = unit;
            }
            pos += 1;
        }
    }
    if let Some(slot) = buf.get_mut(pos) {
        *slot = 0;
    }
    pos
}
