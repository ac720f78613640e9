// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed INI file and a fluent builder so
// each integration test can set up an isolated store without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use profile_store::ProfileStore;
use profile_store::probe::BufferLimits;

/// File name of the INI file inside the temporary directory.
pub const INI_NAME: &str = "profile.ini";

/// An isolated INI file backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct StoreTestContext {
    /// Temporary directory containing the INI file.
    pub dir: tempfile::TempDir,
    /// Store bound to `dir/profile.ini`.
    pub store: ProfileStore,
}

impl StoreTestContext {
    /// Create a context whose INI file does not exist yet.
    pub fn new() -> Self {
        TestContextBuilder::new().build()
    }

    /// Path of the INI file.
    pub fn ini_path(&self) -> PathBuf {
        self.dir.path().join(INI_NAME)
    }

    /// Current file content, or an empty string if the file does not exist.
    pub fn content(&self) -> String {
        std::fs::read_to_string(self.ini_path()).unwrap_or_default()
    }

    /// Open a second store on the same file, as another program would.
    pub fn reopen(&self) -> ProfileStore {
        ProfileStore::open(self.ini_path()).expect("reopen store")
    }

    /// Directory the INI file lives in.
    pub fn dir_path(&self) -> &Path {
        self.dir.path()
    }
}

/// Fluent builder for [`StoreTestContext`].
pub struct TestContextBuilder {
    dir: tempfile::TempDir,
    limits: BufferLimits,
}

impl TestContextBuilder {
    /// Begin building a context in a fresh temporary directory.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            limits: BufferLimits::default(),
        }
    }

    /// Seed the INI file with `content`.
    pub fn with_ini(self, content: &str) -> Self {
        std::fs::write(self.dir.path().join(INI_NAME), content).expect("write ini file");
        self
    }

    /// Use custom probe limits.
    pub fn with_limits(mut self, limits: BufferLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> StoreTestContext {
        let store = ProfileStore::open(self.dir.path().join(INI_NAME))
            .expect("open store")
            .with_limits(self.limits);
        StoreTestContext {
            dir: self.dir,
            store,
        }
    }
}
