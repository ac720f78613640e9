//! Self-contained profile backend over a UTF-8 INI file.
//!
//! Emulates the Windows profile API on every platform: the file is re-read
//! on every call (nothing is cached), a missing file reads as empty, and each
//! write replaces the file atomically through a temporary sibling file.
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::document::Document;
use super::{ProfileBackend, fill_multi, fill_single};
use crate::error::{ProfileError, Result};

/// [`ProfileBackend`] that parses and rewrites the INI file itself.
///
/// # Examples
///
/// ```
/// use profile_store::backend::ProfileBackend;
/// use profile_store::backend::file::IniFileBackend;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("app.ini");
/// let backend = IniFileBackend::new();
///
/// backend.write_string(&path, "ws", Some("k1"), Some("v1")).unwrap();
///
/// let mut buf = [0u16; 16];
/// let n = backend.read_value(&path, "ws", "k1", "", &mut buf).unwrap();
/// assert_eq!(String::from_utf16_lossy(&buf[..n]), "v1");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IniFileBackend;

impl IniFileBackend {
    /// Create a file backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Load and parse the file at `path`. A missing file is an empty document.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the file exists but
    /// cannot be read, or is not valid UTF-8.
    pub fn load(&self, path: &Path) -> Result<Document> {
        match fs::read(path) {
            Ok(bytes) => {
                let content = String::from_utf8(bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
                    .map_err(|e| ProfileError::unavailable(path, e))?;
                Ok(Document::parse(&content))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(ProfileError::unavailable(path, e)),
        }
    }

    /// Atomically replace the file at `path` with the rendered document.
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the target, so readers see either the old or the new
    /// file, never a partial one. A symlinked path is followed, so the link
    /// stays in place and its target receives the write. Permissions of an
    /// existing file are kept; a new file gets the same mode a plain create
    /// would give it under the current umask.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StoreUnavailable`] if the directory is not
    /// writable or the rename fails.
    pub fn save(&self, path: &Path, doc: &Document) -> Result<()> {
        let target = write_target(path);
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let unavailable = |e: io::Error| ProfileError::unavailable(path, e);
        let existing = fs::metadata(&target).ok().map(|meta| meta.permissions());

        let mut builder = tempfile::Builder::new();
        if let Some(perms) = existing.is_none().then(new_file_permissions).flatten() {
            builder.permissions(perms);
        }
        let mut tmp = builder.tempfile_in(dir).map_err(unavailable)?;
        tmp.write_all(doc.render().as_bytes()).map_err(unavailable)?;
        tmp.as_file().sync_all().map_err(unavailable)?;
        if let Some(perms) = existing {
            tmp.as_file().set_permissions(perms).map_err(unavailable)?;
        }
        tmp.persist(&target).map_err(|e| unavailable(e.error))?;
        Ok(())
    }
}

/// The file a write to `path` must land on: the resolved target when `path`
/// is a symlink to an existing file, `path` itself otherwise.
fn write_target(path: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink());
    if is_link {
        dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

/// Mode for a file that does not exist yet, before the umask applies.
#[cfg(unix)]
#[allow(clippy::unnecessary_wraps)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt as _;
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
const fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

impl ProfileBackend for IniFileBackend {
    fn read_value(
        &self,
        path: &Path,
        section: &str,
        key: &str,
        default: &str,
        buf: &mut [u16],
    ) -> Result<usize> {
        let doc = self.load(path)?;
        let value = doc.value(section, key).unwrap_or(default);
        let units: Vec<u16> = value.encode_utf16().collect();
        Ok(fill_single(&units, buf))
    }

    fn read_key_names(&self, path: &Path, section: &str, buf: &mut [u16]) -> Result<usize> {
        let doc = self.load(path)?;
        Ok(fill_multi(doc.key_names(section), buf))
    }

    fn read_section_names(&self, path: &Path, buf: &mut [u16]) -> Result<usize> {
        let doc = self.load(path)?;
        Ok(fill_multi(doc.section_names(), buf))
    }

    fn write_string(
        &self,
        path: &Path,
        section: &str,
        key: Option<&str>,
        value: Option<&str>,
    ) -> Result<()> {
        let mut doc = self.load(path)?;
        let changed = match (key, value) {
            (Some(key), Some(value)) => doc.set(section, key, value),
            (Some(key), None) => doc.remove_key(section, key),
            (None, _) => doc.remove_section(section),
        };
        if !changed {
            debug!(path = %path.display(), section, ?key, "profile write is a no-op");
            return Ok(());
        }
        debug!(path = %path.display(), section, ?key, deleted = value.is_none(), "writing profile");
        self.save(path, &doc)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
