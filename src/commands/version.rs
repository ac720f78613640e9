//! Command: print version information.
use std::io::Write;

/// Version embedded by the build script, or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("PROFILE_STORE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the profile-store version.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn run(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "profile-store {}", version())
}
