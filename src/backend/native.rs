//! Win32 profile API backend.
//!
//! Calls `GetPrivateProfileStringW` and `WritePrivateProfileStringW` from
//! `kernel32` directly. The OS owns parsing, caching, and locking of the
//! file; this module marshals UTF-16 strings across the boundary, quotes
//! values the API would otherwise trim, and creates new files as UTF-16LE.
#![allow(unsafe_code)]

use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write as _};
use std::os::windows::ffi::OsStrExt as _;
use std::path::Path;
use std::ptr;

use tracing::debug;

use super::ProfileBackend;
use super::document::encode_value;
use crate::error::{ProfileError, Result};

#[link(name = "kernel32")]
unsafe extern "system" {
    fn GetPrivateProfileStringW(
        app_name: *const u16,
        key_name: *const u16,
        default: *const u16,
        returned: *mut u16,
        size: u32,
        file_name: *const u16,
    ) -> u32;

    fn WritePrivateProfileStringW(
        app_name: *const u16,
        key_name: *const u16,
        string: *const u16,
        file_name: *const u16,
    ) -> i32;
}

/// [`ProfileBackend`] backed by the operating system's profile API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProfileBackend;

/// NUL-terminated UTF-16 copy of `s`.
fn wide(s: impl AsRef<OsStr>) -> Vec<u16> {
    s.as_ref().encode_wide().chain(std::iter::once(0)).collect()
}

/// Byte order mark that makes the profile API treat a file as UTF-16LE.
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Create `path` holding only a UTF-16LE BOM unless it already exists.
///
/// Without it, the first write creates the file in the ANSI code page and
/// non-ASCII values are lost.
fn ensure_unicode_file(path: &Path) -> io::Result<()> {
    match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => file.write_all(&UTF16LE_BOM),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}

fn opt_ptr(s: Option<&[u16]>) -> *const u16 {
    s.map_or(ptr::null(), <[u16]>::as_ptr)
}

/// Call `GetPrivateProfileStringW`; `None` section or key asks for a name list.
fn get_profile_string(
    path: &Path,
    section: Option<&str>,
    key: Option<&str>,
    default: &str,
    buf: &mut [u16],
) -> usize {
    if buf.is_empty() {
        return 0;
    }
    let section = section.map(wide);
    let key = key.map(wide);
    let default = wide(default);
    let file = wide(path);
    // Buffers beyond u32::MAX units are clamped; the probe ceiling keeps
    // real requests far below that.
    let size = u32::try_from(buf.len()).unwrap_or(u32::MAX);

    // SAFETY: every string pointer is either null (where the API allows it)
    // or points into a live NUL-terminated Vec<u16>; `buf` is valid for
    // `size` writes, and the API never writes more than `size` units.
    let written = unsafe {
        GetPrivateProfileStringW(
            opt_ptr(section.as_deref()),
            opt_ptr(key.as_deref()),
            default.as_ptr(),
            buf.as_mut_ptr(),
            size,
            file.as_ptr(),
        )
    };
    usize::try_from(written).unwrap_or(buf.len())
}

impl ProfileBackend for NativeProfileBackend {
    fn read_value(
        &self,
        path: &Path,
        section: &str,
        key: &str,
        default: &str,
        buf: &mut [u16],
    ) -> Result<usize> {
        Ok(get_profile_string(path, Some(section), Some(key), default, buf))
    }

    fn read_key_names(&self, path: &Path, section: &str, buf: &mut [u16]) -> Result<usize> {
        Ok(get_profile_string(path, Some(section), None, "", buf))
    }

    fn read_section_names(&self, path: &Path, buf: &mut [u16]) -> Result<usize> {
        Ok(get_profile_string(path, None, None, "", buf))
    }

    fn write_string(
        &self,
        path: &Path,
        section: &str,
        key: Option<&str>,
        value: Option<&str>,
    ) -> Result<()> {
        if key.is_some() && value.is_some() {
            ensure_unicode_file(path).map_err(|e| ProfileError::unavailable(path, e))?;
        }
        let section_w = wide(section);
        let key_w = key.map(wide);
        let value_w = value.map(|v| wide(encode_value(v)));
        let file = wide(path);

        debug!(path = %path.display(), section, ?key, deleted = value.is_none(), "writing profile via kernel32");

        // SAFETY: all pointers are null or point into live NUL-terminated
        // buffers that outlive the call.
        let ok = unsafe {
            WritePrivateProfileStringW(
                section_w.as_ptr(),
                opt_ptr(key_w.as_deref()),
                opt_ptr(value_w.as_deref()),
                file.as_ptr(),
            )
        };
        if ok == 0 {
            return Err(ProfileError::unavailable(path, io::Error::last_os_error()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "native"
    }
}
