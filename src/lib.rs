//! Classic INI profile files behind a typed store.
//!
//! [`store::ProfileStore`] reads and writes the sections and entries of one
//! INI file. Every call goes to the file: nothing is cached, so the store
//! always observes edits made by other programs.
//!
//! The public API is organised into layers:
//!
//! - **[`store`]**: the façade callers use (`entry_value`, `write_entry`,
//!   `section_names`, …)
//! - **[`probe`]**: the growing-buffer read loop every enumeration goes through
//! - **[`backend`]**: the four profile primitives, implemented over a
//!   self-parsed file ([`backend::file`]) or, on Windows, the OS profile API
//! - **[`config`]**, **[`logging`]**, **[`cli`]**, **[`commands`]**: the
//!   `profile-store` command-line front end
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod platform;
pub mod probe;
pub mod store;

pub use error::{ProfileError, Result};
pub use store::ProfileStore;
