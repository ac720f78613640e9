//! Commands: `sections`, `keys`, `entries`, `show`.
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use super::Outcome;
use crate::store::ProfileStore;

#[derive(Debug, Serialize)]
struct EntryRow {
    key: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct SectionRow {
    section: String,
    entries: Vec<EntryRow>,
}

fn rows(entries: Vec<(String, String)>) -> Vec<EntryRow> {
    entries
        .into_iter()
        .map(|(key, value)| EntryRow { key, value })
        .collect()
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_names(names: &[String], json: bool, out: &mut impl Write) -> Result<Outcome> {
    if json {
        print_json(out, &names)?;
    } else {
        for name in names {
            writeln!(out, "{name}")?;
        }
    }
    Ok(Outcome::Success)
}

/// List section names, one per line.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output cannot be written.
pub fn sections(store: &ProfileStore, json: bool, out: &mut impl Write) -> Result<Outcome> {
    print_names(&store.section_names()?, json, out)
}

/// List the keys of `section`, one per line.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output cannot be written.
pub fn keys(store: &ProfileStore, section: &str, json: bool, out: &mut impl Write) -> Result<Outcome> {
    print_names(&store.entry_names(section)?, json, out)
}

/// List the entries of `section` as `key=value` lines.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output cannot be written.
pub fn entries(store: &ProfileStore, section: &str, json: bool, out: &mut impl Write) -> Result<Outcome> {
    let entries = store.entries(section)?;
    if json {
        print_json(out, &rows(entries))?;
    } else {
        for (key, value) in entries {
            writeln!(out, "{key}={value}")?;
        }
    }
    Ok(Outcome::Success)
}

/// Print every section with its entries in INI layout.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output cannot be written.
pub fn show(store: &ProfileStore, json: bool, out: &mut impl Write) -> Result<Outcome> {
    let sections = store
        .section_names()?
        .into_iter()
        .map(|section| {
            let entries = rows(store.entries(&section)?);
            Ok(SectionRow { section, entries })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        print_json(out, &sections)?;
        return Ok(Outcome::Success);
    }
    for (i, row) in sections.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "[{}]", row.section)?;
        for entry in &row.entries {
            writeln!(out, "{}={}", entry.key, entry.value)?;
        }
    }
    Ok(Outcome::Success)
}
