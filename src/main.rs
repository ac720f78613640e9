//! `profile-store` command-line tool.
use std::io::Write as _;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;

use profile_store::{cli, commands, logging};

fn main() -> Result<ExitCode> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.global.verbose, args.global.log_file.as_deref())
        .context("initialising logging")?;

    let mut out = std::io::stdout().lock();
    let outcome = commands::run(&args, &mut out)?;
    out.flush()?;
    Ok(outcome.into())
}
