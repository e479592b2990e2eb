// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Source archival: staged git exports packed into a zip.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::utility::remove_dir_if_exists;
use crate::utility::zip::{ZipMode, make_zip};

use super::Repository;

/// Transient directory holding exported trees until the zip is written.
///
/// The directory is recreated on construction and removed on drop, so the
/// staging area disappears on every exit path.
struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    fn create(path: PathBuf) -> Result<Self> {
        remove_dir_if_exists(&path)
            .with_context(|| format!("failed to clear {}", path.display()))?;
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_dir_all(&self.path) {
            warn!(
                staging = %self.path.display(),
                %err,
                "failed to remove staging directory"
            );
        }
    }
}

impl Repository {
    /// Archives the sources of the parent and every sub-repository into a
    /// zip at `destination`.
    ///
    /// Exports each repository's tracked tree at `version` (the current
    /// branch or tag when `None`) into a `sources` staging directory next to
    /// the destination: the parent at the top level, each module under its
    /// own name, each addon under `addons/<name>`. The staging directory is
    /// packed into the zip and removed, on failure paths included.
    pub async fn archive(
        &mut self,
        destination: &Path,
        version: Option<&str>,
        include_optional: bool,
    ) -> Result<()> {
        let version = match version {
            Some(version) => version.to_string(),
            None => self.current_version().await?,
        };
        info!(archive = %destination.display(), version, "archiving sources");

        let staging_parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let staging = StagingDir::create(staging_parent.join("sources"))?;

        self.git
            .export_tree(&self.tar, &self.base_dir, &version, None, staging.path())
            .await?;

        let base_dir = self.base_dir.clone();
        for module in self.modules().await?.to_vec() {
            debug!(%module, "exporting module");
            self.git
                .export_tree(
                    &self.tar,
                    &base_dir.join(&module),
                    &version,
                    Some(&module),
                    staging.path(),
                )
                .await?;
        }

        let addons = self.addons(include_optional).await?.to_vec();
        if !addons.is_empty() {
            let addon_staging = staging.path().join(&self.addons_dir);
            fs::create_dir_all(&addon_staging)?;
            let addons_path = self.addons_path();
            for addon in addons {
                debug!(%addon, "exporting addon");
                self.git
                    .export_tree(
                        &self.tar,
                        &addons_path.join(&addon),
                        &version,
                        Some(&addon),
                        &addon_staging,
                    )
                    .await?;
            }
        }

        make_zip(destination, staging.path(), Path::new("."), ZipMode::Create)?;
        Ok(())
    }
}
