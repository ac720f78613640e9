//! Commands: `get`, `has-key`, `has-section`, `find`.
use std::io::Write;

use anyhow::Result;

use super::Outcome;
use crate::store::ProfileStore;

/// Print the value of `key` in `section`; absent keys print an empty line.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output cannot be written.
pub fn get(store: &ProfileStore, section: &str, key: &str, out: &mut impl Write) -> Result<Outcome> {
    writeln!(out, "{}", store.entry_value(section, key)?)?;
    Ok(Outcome::Success)
}

/// Print `true` or `false`; a missing or empty key is [`Outcome::NotFound`].
///
/// # Errors
///
/// Returns an error if the store cannot be read or output cannot be written.
pub fn has_key(store: &ProfileStore, section: &str, key: &str, out: &mut impl Write) -> Result<Outcome> {
    let found = store.key_exists(section, key)?;
    writeln!(out, "{found}")?;
    Ok(Outcome::from_found(found))
}

/// Print `true` or `false`; a missing section is [`Outcome::NotFound`].
///
/// # Errors
///
/// Returns an error if the store cannot be read or output cannot be written.
pub fn has_section(store: &ProfileStore, section: &str, out: &mut impl Write) -> Result<Outcome> {
    let found = store.section_exists(section)?;
    writeln!(out, "{found}")?;
    Ok(Outcome::from_found(found))
}

/// Print the first section whose `key` equals `value`.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output cannot be written.
pub fn find(store: &ProfileStore, key: &str, value: &str, out: &mut impl Write) -> Result<Outcome> {
    let section = store.find_section_by_key_and_value(key, value)?;
    if let Some(section) = &section {
        writeln!(out, "{section}")?;
    }
    Ok(Outcome::from_found(section.is_some()))
}
