//! Store path resolution.
use std::path::{Path, PathBuf};

use crate::error::{ProfileError, Result};

/// Resolve `path` to an absolute path against the current directory.
///
/// The file does not need to exist. The result is captured once when a store
/// is constructed, so later changes of the working directory do not move the
/// store. On Windows, verbatim `\\?\` prefixes are simplified away where that
/// is lossless.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidPath`] for an empty path or when the
/// current directory cannot be determined.
///
/// # Examples
///
/// ```
/// use profile_store::paths::resolve;
///
/// let abs = resolve("settings.ini").unwrap();
/// assert!(abs.is_absolute());
/// assert!(abs.ends_with("settings.ini"));
/// ```
pub fn resolve(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(ProfileError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path is empty".to_string(),
        });
    }
    let absolute = std::path::absolute(path).map_err(|e| ProfileError::InvalidPath {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(dunce::simplified(&absolute).to_path_buf())
}
