// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recursive clone/update across the parent and its sub-repositories.

use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;

use super::Repository;

impl Repository {
    /// Fetches and reconciles the parent repository, then clones or updates
    /// every module and addon at `version`.
    ///
    /// # Errors
    ///
    /// A failure in any repository aborts the run; the remaining
    /// sub-repositories are not touched.
    pub async fn clone_or_update_all(&mut self, version: &str, include_optional: bool) -> Result<()> {
        info!(version, "updating parent repository");
        self.git
            .fetch(&self.base_dir, &self.alias, self.retry)
            .await?;
        self.reconcile_version(&self.base_dir, version).await?;

        let base_dir = self.base_dir.clone();
        for module in self.modules().await?.to_vec() {
            let url = self.module_url(&module);
            self.update_one(&module, version, &url, &base_dir).await?;
        }

        let addons_path = self.addons_path();
        for addon in self.addons(include_optional).await?.to_vec() {
            let url = self.addon_url(&addon);
            self.update_one(&addon, version, &url, &addons_path).await?;
        }

        Ok(())
    }

    /// Clones a sub-repository if absent, fetches it if present, then
    /// reconciles it to `version`.
    pub async fn update_one(
        &self,
        name: &str,
        version: &str,
        url: &str,
        parent_dir: &Path,
    ) -> Result<()> {
        let dir = parent_dir.join(name);
        if dir.is_dir() {
            info!(%name, "updating");
            self.git.fetch(&dir, &self.alias, self.retry).await?;
        } else {
            info!(%name, %url, "cloning");
            self.git.clone_into(parent_dir, url, self.retry).await?;
        }
        self.reconcile_version(&dir, version).await
    }

    /// Brings a repository's workspace to `version`.
    ///
    /// Three cases:
    /// 1. `version` is a tag: check it out (detached).
    /// 2. no local branch named `version`: create one tracking
    ///    `<alias>/<version>`.
    /// 3. a local branch exists: check it out and rebase onto
    ///    `<alias>/<version>`; when the rebase fails, stash local
    ///    modifications, rebase again, and pop the stash.
    ///
    /// The recovery path assumes the first rebase failed because of
    /// uncommitted local modifications. A true merge conflict makes the
    /// second rebase fail as well, and that failure propagates untouched.
    pub async fn reconcile_version(&self, dir: &Path, version: &str) -> Result<()> {
        let tags = self.git.tags(dir).await?;
        if tags.iter().any(|tag| tag == version) {
            return self.git.checkout(dir, version).await;
        }

        let branches = self.git.branches(dir).await?;
        if !branches.iter().any(|branch| branch == version) {
            return self
                .git
                .checkout_tracking(dir, version, &self.alias)
                .await;
        }

        self.git.checkout(dir, version).await?;
        info!(version, dir = %dir.display(), "rebasing branch");
        let upstream = format!("{}/{version}", self.alias);
        let code = self.git.rebase_allowed(dir, &upstream).await?;
        if code != 0 {
            warn!(code, "rebase failed, stashing local modifications");
            self.git.stash_push(dir).await?;
            self.git.rebase(dir, &upstream).await?;
            self.git.stash_pop(dir).await?;
        }
        Ok(())
    }
}
