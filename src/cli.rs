//! Command-line definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::backend::BackendKind;
use crate::config::Overrides;

/// Top-level CLI entry point for the profile store.
#[derive(Parser, Debug)]
#[command(
    name = "profile-store",
    about = "Read and write sections and entries of INI profile files",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// INI file to operate on
    #[arg(short, long, global = true, value_name = "INI")]
    pub file: Option<PathBuf>,

    /// Settings file (defaults to $XDG_CONFIG_HOME/profile-store/config.toml)
    #[arg(long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Backend used for file access
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Largest buffer, in UTF-16 code units, a single read may allocate
    #[arg(long, global = true, value_name = "UNITS")]
    pub max_buffer: Option<usize>,

    /// Print lists and entries as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also append all log events to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Settings overrides given on the command line.
    #[must_use]
    pub const fn overrides(&self) -> Overrides {
        Overrides {
            backend: self.backend,
            max_capacity: self.max_buffer,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value of a key (empty when absent)
    Get {
        /// Section name
        section: String,
        /// Key name
        key: String,
    },
    /// Set a key, creating the section and file if needed
    Set {
        /// Section name
        section: String,
        /// Key name
        key: String,
        /// New value
        value: String,
    },
    /// Set several keys of one section
    SetMany {
        /// Section name
        section: String,
        /// Entries as KEY=VALUE
        #[arg(required = true, value_name = "KEY=VALUE", value_parser = parse_pair)]
        entries: Vec<(String, String)>,
    },
    /// Delete a key
    Delete {
        /// Section name
        section: String,
        /// Key name
        key: String,
    },
    /// Delete a section and all of its entries
    DeleteSection {
        /// Section name
        section: String,
    },
    /// Exit with status 1 unless the key has a non-empty value
    HasKey {
        /// Section name
        section: String,
        /// Key name
        key: String,
    },
    /// Exit with status 1 unless the section exists
    HasSection {
        /// Section name
        section: String,
    },
    /// Print the first section whose key has the given value
    Find {
        /// Key name
        key: String,
        /// Value to match exactly
        value: String,
    },
    /// List section names
    Sections,
    /// List the keys of a section
    Keys {
        /// Section name
        section: String,
    },
    /// List the entries of a section
    Entries {
        /// Section name
        section: String,
    },
    /// Print every section with its entries
    Show,
    /// Copy every entry of one section into another
    CopySection {
        /// Source section
        from: String,
        /// Destination section
        to: String,
    },
    /// Generate a shell completion script
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

/// Parse a `KEY=VALUE` argument, splitting at the first `=`.
fn parse_pair(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{arg}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{arg}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
