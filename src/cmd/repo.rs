// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository commands: clone, archive, exec, modules, addons.
//!
//! Each handler maps the parent directory through the long-path workaround,
//! opens the repository there, and releases the mapping when done. Handlers
//! return the underlying error untouched so `main` can surface the child
//! exit code.

use std::path::Path;

use crate::cli::repo::{AddonsArgs, ArchiveArgs, CloneArgs, ExecArgs};
use crate::config::Config;
use crate::error::Result;
use crate::platform::DriveMapping;
use crate::repo::Repository;

/// Run the clone command.
///
/// # Errors
///
/// Fails when any repository cannot be cloned, fetched, or reconciled.
pub async fn run_clone_command(args: &CloneArgs, config: &Config, base_dir: &Path) -> Result<()> {
    let mapping = DriveMapping::acquire(base_dir).await?;
    let mut repo = Repository::open(mapping.root(), config).await?;

    let version = match &args.version {
        Some(version) => version.clone(),
        None => repo.current_version().await?,
    };
    let result = repo
        .clone_or_update_all(&version, args.with_optionals)
        .await;

    mapping.release().await?;
    result
}

/// Run the archive command.
///
/// # Errors
///
/// Fails when any repository's tree cannot be exported or the zip cannot be
/// written.
pub async fn run_archive_command(
    args: &ArchiveArgs,
    config: &Config,
    base_dir: &Path,
) -> Result<()> {
    let mapping = DriveMapping::acquire(base_dir).await?;
    let mut repo = Repository::open(mapping.root(), config).await?;

    let result = repo
        .archive(&args.archive, args.version.as_deref(), args.with_optionals)
        .await;

    mapping.release().await?;
    result
}

/// Run the exec command.
///
/// # Errors
///
/// Fails as soon as the command fails in any repository.
pub async fn run_exec_command(args: &ExecArgs, config: &Config, base_dir: &Path) -> Result<()> {
    let command = args.command.join(" ");

    let mapping = DriveMapping::acquire(base_dir).await?;
    let mut repo = Repository::open(mapping.root(), config).await?;

    let result = repo.for_each(&command, args.with_optionals).await;

    mapping.release().await?;
    result
}

/// Run the modules command.
///
/// # Errors
///
/// Fails when the repository cannot be opened or introspected.
pub async fn run_modules_command(config: &Config, base_dir: &Path) -> Result<()> {
    let mut repo = Repository::open(base_dir, config).await?;
    for module in repo.modules().await? {
        println!("{module}");
    }
    Ok(())
}

/// Run the addons command.
///
/// # Errors
///
/// Fails when the repository cannot be opened or introspected.
pub async fn run_addons_command(args: &AddonsArgs, config: &Config, base_dir: &Path) -> Result<()> {
    let mut repo = Repository::open(base_dir, config).await?;
    for addon in repo.addons(args.with_optionals).await? {
        println!("{addon}");
    }
    Ok(())
}
