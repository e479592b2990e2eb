// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Zip archive creation and extraction.
//!
//! ```text
//! make_zip(archive, root, base, mode)
//!     walk root/base (hidden files included, ignore rules off)
//!     store entries relative to root, deflate-compressed
//!
//! extract_zip(archive, out_dir)
//!     recreate the stored tree under out_dir
//! ```
//!
//! Entry names always use `/` separators, so archives written on one
//! platform extract on any other.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use anyhow::Context;
use ignore::WalkBuilder;
use tracing::{debug, trace};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{FsError, Result};

/// Whether [`make_zip`] starts a fresh archive or extends an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipMode {
    /// Truncate and write a new archive.
    Create,
    /// Append entries to an existing archive.
    Append,
}

/// Packs `root_dir/base_dir` into `archive`, with entry names relative to
/// `root_dir`.
///
/// Hidden files are included and ignore files (`.gitignore` and friends) are
/// not honored: an archive holds exactly what is on disk.
///
/// # Errors
///
/// Fails if the base directory does not exist, if the walk hits an
/// unreadable entry, or on any archive write error.
pub fn make_zip(archive: &Path, root_dir: &Path, base_dir: &Path, mode: ZipMode) -> Result<()> {
    let tree = root_dir.join(base_dir);
    if !tree.is_dir() {
        return Err(FsError::NotFound(tree.display().to_string()).into());
    }

    debug!(
        archive = %archive.display(),
        tree = %tree.display(),
        ?mode,
        "packing archive"
    );

    let mut writer = match mode {
        ZipMode::Create => ZipWriter::new(
            File::create(archive)
                .with_context(|| format!("failed to create {}", archive.display()))?,
        ),
        ZipMode::Append => {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .open(archive)
                .with_context(|| format!("failed to open {} for append", archive.display()))?;
            ZipWriter::new_append(file)
                .with_context(|| format!("{} is not a zip archive", archive.display()))?
        }
    };

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let walk = WalkBuilder::new(&tree)
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .sort_by_file_path(Ord::cmp)
        .build();

    for entry in walk {
        let entry = entry.context("directory walk failed")?;
        let path = entry.path();
        let relative = path
            .strip_prefix(root_dir)
            .context("walked outside the archive root")?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        let name = zip_entry_name(relative);

        if path.is_dir() {
            writer.add_directory(name.as_str(), options)?;
            continue;
        }

        trace!(entry = %name, "adding");
        writer.start_file(name.as_str(), zip_options_for(path, options)?)?;
        let mut input = File::open(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        io::copy(&mut input, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}

/// Unpacks `archive` into `out_dir`, creating it if needed.
///
/// Entries resolving outside `out_dir` are rejected.
pub fn extract_zip(archive: &Path, out_dir: &Path) -> Result<()> {
    debug!(archive = %archive.display(), out = %out_dir.display(), "extracting archive");

    let file = File::open(archive)
        .with_context(|| format!("failed to open {}", archive.display()))?;
    let mut zip = ZipArchive::new(file)
        .with_context(|| format!("{} is not a zip archive", archive.display()))?;

    fs::create_dir_all(out_dir)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            anyhow::bail!("archive entry {:?} escapes the output directory", entry.name());
        };
        let target = out_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut output = File::create(&target)
            .with_context(|| format!("failed to create {}", target.display()))?;
        io::copy(&mut entry, &mut output)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}

/// Converts a relative path into a forward-slash zip entry name.
fn zip_entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// File options carrying the source file's unix permissions.
#[cfg(unix)]
fn zip_options_for(path: &Path, options: SimpleFileOptions) -> Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path)?.permissions().mode();
    Ok(options.unix_permissions(mode))
}

#[cfg(not(unix))]
fn zip_options_for(_path: &Path, options: SimpleFileOptions) -> Result<SimpleFileOptions> {
    Ok(options)
}
