// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Multi-repository orchestration.
//!
//! ```text
//! Repository::open(base_dir, config)
//!     |  resolve remote, derive URL template, color-config check
//!     v
//! discovery   modules() / addons()      (maven effective-POM, cached)
//! update      clone_or_update_all()     (fetch + reconcile per repo)
//! archive     archive()                 (staged git exports -> zip)
//! for_each    run a shell command across every repository
//! ```
//!
//! All operations take the parent repository as the root and treat the
//! discovered modules and addons as peers beneath it. Child processes get an
//! explicit working directory; the orchestrator's own cwd never changes.

mod archive;
mod discovery;
mod update;

#[cfg(test)]
mod tests;

pub use discovery::parse_module_lines;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::git::Git;
use crate::process::{ProcessBuilder, RetryPolicy};

/// Placeholder substituted with a module or addon name in URL templates.
const MODULE_PLACEHOLDER: &str = "{module}";

/// Handle on the parent repository and its discovered sub-repositories.
///
/// Module and addon lists are discovered lazily and cached for the rest of
/// the run.
#[derive(Debug)]
pub struct Repository {
    base_dir: PathBuf,
    alias: String,
    url_pattern: String,
    is_online: bool,
    addons_dir: String,
    optional_descriptor: String,
    git: Git,
    mvn: PathBuf,
    tar: PathBuf,
    retry: RetryPolicy,
    modules: Option<Vec<String>>,
    addons: Option<Vec<String>>,
}

impl Repository {
    /// Opens the parent repository at `base_dir`.
    ///
    /// Resolves the configured remote alias to its URL and derives the
    /// template used to locate module and addon repositories: an online
    /// remote (URL ending in `/<project>.git`) hosts each sub-repository as
    /// a sibling of the parent, an offline mirror nests them under the
    /// parent URL.
    ///
    /// # Errors
    ///
    /// Fails when the alias is not configured or when git's coloring
    /// settings would corrupt captured output.
    pub async fn open(base_dir: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let base_dir = base_dir.into();
        let git = Git::new(&config.tools.git);

        git.assert_color_config(&base_dir).await?;

        let alias = config.repo.alias.clone();
        let url = git.remote_url(&base_dir, &alias).await?;

        let project_suffix = format!("/{}.git", config.repo.project);
        let (is_online, url_pattern) = match url.strip_suffix(&project_suffix) {
            Some(prefix) => (true, format!("{prefix}/{MODULE_PLACEHOLDER}.git")),
            None => (false, format!("{url}/{MODULE_PLACEHOLDER}")),
        };

        info!(
            base = %base_dir.display(),
            %alias,
            online = is_online,
            template = %url_pattern,
            "opened repository"
        );

        Ok(Self {
            base_dir,
            alias,
            url_pattern,
            is_online,
            addons_dir: config.repo.addons_dir.clone(),
            optional_descriptor: config.repo.optional_descriptor.clone(),
            git,
            mvn: config.tools.mvn.clone(),
            tar: config.tools.tar.clone(),
            retry: RetryPolicy::from(config.retry),
            modules: None,
            addons: None,
        })
    }

    /// Parent repository directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Whether the remote is the online upstream rather than a mirror.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.is_online
    }

    /// Directory holding the addon repositories.
    #[must_use]
    pub fn addons_path(&self) -> PathBuf {
        self.base_dir.join(&self.addons_dir)
    }

    /// Remote URL of a module repository.
    #[must_use]
    pub fn module_url(&self, name: &str) -> String {
        self.url_pattern.replace(MODULE_PLACEHOLDER, name)
    }

    /// Remote URL of an addon repository.
    ///
    /// Online remotes host addons as siblings of the modules; offline
    /// mirrors nest them under `addons/`.
    #[must_use]
    pub fn addon_url(&self, name: &str) -> String {
        if self.is_online {
            self.module_url(name)
        } else {
            self.url_pattern
                .replace(MODULE_PLACEHOLDER, &format!("{}/{name}", self.addons_dir))
        }
    }

    /// Module names from the parent build descriptor, discovered on first
    /// use and cached.
    pub async fn modules(&mut self) -> Result<&[String]> {
        if self.modules.is_none() {
            info!("introspecting the parent build descriptor for sub-repositories");
            let found = discovery::discover_modules(&self.mvn, &self.base_dir).await?;
            self.modules = Some(found);
        }
        Ok(self.modules.as_deref().unwrap_or_default())
    }

    /// Addon names from the addons build descriptor, discovered on first
    /// use and cached.
    ///
    /// With `include_optional`, names from the alternate optional
    /// descriptor are appended after the primary list.
    pub async fn addons(&mut self, include_optional: bool) -> Result<&[String]> {
        if self.addons.is_none() {
            info!("introspecting the addons build descriptor");
            let found = discovery::discover_addons(
                &self.mvn,
                &self.addons_path(),
                &self.optional_descriptor,
                include_optional,
            )
            .await?;
            self.addons = Some(found);
        }
        Ok(self.addons.as_deref().unwrap_or_default())
    }

    /// Replaces the cached module list, skipping build-tool discovery.
    pub fn set_modules(&mut self, modules: Vec<String>) {
        self.modules = Some(modules);
    }

    /// Replaces the cached addon list, skipping build-tool discovery.
    pub fn set_addons(&mut self, addons: Vec<String>) {
        self.addons = Some(addons);
    }

    /// Branch or tag name of the parent workspace.
    pub async fn current_version(&self) -> Result<String> {
        self.git.describe_version(&self.base_dir).await
    }

    /// Runs a shell command in the parent repository and then in every
    /// module and addon directory, in discovery order.
    ///
    /// # Errors
    ///
    /// A failure in any directory aborts the traversal.
    pub async fn for_each(&mut self, command: &str, include_optional: bool) -> Result<()> {
        run_shell_in(command, &self.base_dir).await?;

        for module in self.modules().await?.to_vec() {
            run_shell_in(command, &self.base_dir.join(&module)).await?;
        }

        let addons_path = self.addons_path();
        for addon in self.addons(include_optional).await?.to_vec() {
            run_shell_in(command, &addons_path.join(&addon)).await?;
        }

        Ok(())
    }
}

/// Runs a raw shell command with output forwarded to the log.
async fn run_shell_in(command: &str, dir: &Path) -> Result<()> {
    info!(cmd = %command, dir = %dir.display(), "$>");
    ProcessBuilder::raw(command).cwd(dir).run().await?;
    Ok(())
}
