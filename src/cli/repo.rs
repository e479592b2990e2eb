// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the repository commands.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the clone command.
#[derive(Debug, Clone, Default, Args)]
pub struct CloneArgs {
    /// Branch or tag to bring every repository to.
    /// Defaults to the parent workspace's current branch or tag.
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,

    /// Also clone/update the optional addons.
    #[arg(long = "with-optionals")]
    pub with_optionals: bool,
}

/// Arguments for the archive command.
#[derive(Debug, Clone, Args)]
pub struct ArchiveArgs {
    /// Path of the zip archive to produce.
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Branch or tag to export.
    /// Defaults to the parent workspace's current branch or tag.
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,

    /// Also archive the optional addons.
    #[arg(long = "with-optionals")]
    pub with_optionals: bool,
}

/// Arguments for the exec command.
#[derive(Debug, Clone, Args)]
pub struct ExecArgs {
    /// Shell command to run in every repository.
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true)]
    pub command: Vec<String>,

    /// Also run in the optional addons.
    #[arg(long = "with-optionals")]
    pub with_optionals: bool,
}

/// Arguments for the addons command.
#[derive(Debug, Clone, Default, Args)]
pub struct AddonsArgs {
    /// Also list the optional addons.
    #[arg(long = "with-optionals")]
    pub with_optionals: bool,
}
