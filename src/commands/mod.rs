//! Subcommand handlers.
//!
//! Every handler writes its output to a caller-supplied writer, so the binary
//! passes a locked stdout and tests pass a `Vec<u8>`.
pub mod completions;
pub mod list;
pub mod query;
pub mod version;
pub mod write;

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Settings;
use crate::store::ProfileStore;

/// Result of a successful command, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exit status 0.
    Success,
    /// Exit status 1: the queried key, section or match does not exist.
    NotFound,
}

impl Outcome {
    /// `Success` when `found`, `NotFound` otherwise.
    #[must_use]
    pub const fn from_found(found: bool) -> Self {
        if found { Self::Success } else { Self::NotFound }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::SUCCESS,
            Outcome::NotFound => Self::from(1),
        }
    }
}

/// Load settings and open the store named by `--file`.
///
/// # Errors
///
/// Returns an error if `--file` is missing, the settings are invalid, or
/// the configured backend is unavailable.
pub fn open_store(global: &GlobalOpts) -> Result<ProfileStore> {
    let file = global
        .file
        .as_deref()
        .context("no INI file given; pass --file <INI>")?;
    let settings = Settings::load(global.config.as_deref(), global.overrides())
        .context("loading settings")?;
    debug!(backend = %settings.store.backend, max_buffer = settings.buffer.max_capacity, "settings loaded");
    ProfileStore::from_settings(file, &settings)
        .with_context(|| format!("opening {}", file.display()))
}

/// Dispatch the parsed command line.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, an operation fails, or
/// output cannot be written.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<Outcome> {
    let json = cli.global.json;
    match &cli.command {
        Command::Completions { shell } => {
            completions::run(*shell, out);
            return Ok(Outcome::Success);
        }
        Command::Version => {
            version::run(out)?;
            return Ok(Outcome::Success);
        }
        _ => {}
    }

    let store = open_store(&cli.global)?;
    match &cli.command {
        Command::Get { section, key } => query::get(&store, section, key, out),
        Command::HasKey { section, key } => query::has_key(&store, section, key, out),
        Command::HasSection { section } => query::has_section(&store, section, out),
        Command::Find { key, value } => query::find(&store, key, value, out),
        Command::Sections => list::sections(&store, json, out),
        Command::Keys { section } => list::keys(&store, section, json, out),
        Command::Entries { section } => list::entries(&store, section, json, out),
        Command::Show => list::show(&store, json, out),
        Command::Set {
            section,
            key,
            value,
        } => write::set(&store, section, key, value),
        Command::SetMany { section, entries } => write::set_many(&store, section, entries),
        Command::Delete { section, key } => write::delete(&store, section, key),
        Command::DeleteSection { section } => write::delete_section(&store, section),
        Command::CopySection { from, to } => write::copy_section(&store, from, to),
        Command::Completions { .. } | Command::Version => Ok(Outcome::Success),
    }
}
