//! Commands: `set`, `set-many`, `delete`, `delete-section`, `copy-section`.
use anyhow::{Context as _, Result};
use tracing::info;

use super::Outcome;
use crate::store::ProfileStore;

/// Set `key` in `section` to `value`.
///
/// # Errors
///
/// Returns an error if the name or value is invalid or the file cannot be
/// written.
pub fn set(store: &ProfileStore, section: &str, key: &str, value: &str) -> Result<Outcome> {
    store
        .write_entry(section, key, Some(value))
        .with_context(|| format!("setting [{section}] {key}"))?;
    Ok(Outcome::Success)
}

/// Set every `(key, value)` pair in `section`, in order.
///
/// # Errors
///
/// Returns the first write error; earlier pairs stay written.
pub fn set_many(store: &ProfileStore, section: &str, entries: &[(String, String)]) -> Result<Outcome> {
    store
        .write_entries(section, entries.iter().map(|(k, v)| (k, Some(v))))
        .with_context(|| format!("writing entries to [{section}]"))?;
    Ok(Outcome::Success)
}

/// Delete `key` from `section`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn delete(store: &ProfileStore, section: &str, key: &str) -> Result<Outcome> {
    store
        .delete_entry(section, key)
        .with_context(|| format!("deleting [{section}] {key}"))?;
    Ok(Outcome::Success)
}

/// Delete `section` and its entries.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn delete_section(store: &ProfileStore, section: &str) -> Result<Outcome> {
    store
        .delete_section(section)
        .with_context(|| format!("deleting [{section}]"))?;
    Ok(Outcome::Success)
}

/// Copy every entry of `from` into `to`, overwriting keys `to` already has.
///
/// # Errors
///
/// Returns an error if either section cannot be read or written.
pub fn copy_section(store: &ProfileStore, from: &str, to: &str) -> Result<Outcome> {
    let entries = store
        .entries(from)
        .with_context(|| format!("reading [{from}]"))?;
    let count = entries.len();
    store
        .write_entries(to, entries.into_iter().map(|(k, v)| (k, Some(v))))
        .with_context(|| format!("writing entries to [{to}]"))?;
    info!("copied {count} entries from [{from}] to [{to}]");
    Ok(Outcome::Success)
}
