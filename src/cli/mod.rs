// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for grove using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! grove [global options] <command>
//! clone [VERSION]
//! archive <ARCHIVE> [VERSION]
//! exec <COMMAND>...
//! modules
//! addons
//! options
//! inis
//! version
//! ```

pub mod global;
pub mod repo;


use crate::cli::global::GlobalOptions;
use crate::cli::repo::{AddonsArgs, ArchiveArgs, CloneArgs, ExecArgs};
use clap::{Parser, Subcommand};

/// grove - multi-repository source-control orchestrator
#[derive(Debug, Parser)]
#[command(
    name = "grove",
    author,
    version,
    about = "Multi-repository source-control orchestrator",
    long_about = "Orchestrates clone, update and archive operations across a\n\
                  parent repository and the sub-repositories (modules and\n\
                  addons) its build descriptors declare. Operates from the\n\
                  parent repository unless --base-dir says otherwise. See\n\
                  `grove <command> --help` for more information about a command.",
    after_help = "INI FILES:\n\n\
                  By default, grove loads `grove.toml` from the current\n\
                  directory when present. Additional files can be specified\n\
                  with --ini and are loaded on top of it, last file winning.\n\
                  Use --no-default-inis to disable auto detection and only\n\
                  use --ini. Individual options can be overridden with\n\
                  --set section.key=value."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values from the INIs.
    Options,

    /// Lists the INIs used by grove.
    Inis,

    /// Clones or updates the parent repository and every sub-repository.
    Clone(CloneArgs),

    /// Archives the sources of every repository into a zip.
    Archive(ArchiveArgs),

    /// Runs a shell command in every repository.
    Exec(ExecArgs),

    /// Lists the modules declared by the parent build descriptor.
    Modules,

    /// Lists the addons declared under the addons directory.
    Addons(AddonsArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
