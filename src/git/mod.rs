// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations over the git command line.
//!
//! ```text
//!        Git (configured executable)
//!   refs:    tags / branches / describe_version
//!   remotes: remotes / remote_url
//!   sync:    fetch / clone_into / checkout / rebase / stash
//!   export:  export_tree (git archive | tar -x)
//!   checks:  assert_color_config
//! ```
//!
//! Everything shells out; there is no in-process git. Read-only queries
//! capture output, mutations stream it to the log. `GIT_TERMINAL_PROMPT` is
//! always disabled so an unreachable remote fails instead of hanging.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context;
use tracing::debug;

use crate::error::{ConfigError, GitError, Result};
use crate::process::{ProcessBuilder, ProcessFlags, RetryPolicy};


/// A remote listed by `git remote -v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Handle on a configured git executable.
#[derive(Debug, Clone)]
pub struct Git {
    program: PathBuf,
}

impl Git {
    /// Creates a handle using the given git executable.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
        }
    }

    /// Base builder with the standard git environment.
    fn builder(&self, cwd: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .cwd(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
    }

    /// Runs a git command, failing on non-zero exit.
    pub async fn run(&self, args: &[&str], cwd: &Path) -> Result<()> {
        self.builder(cwd).args(args).run().await?;
        Ok(())
    }

    /// Runs a git command tolerating failure, returning the exit code.
    pub async fn run_allowed(&self, args: &[&str], cwd: &Path) -> Result<i32> {
        let output = self
            .builder(cwd)
            .args(args)
            .flag(ProcessFlags::ALLOW_FAILURE)
            .run()
            .await?;
        Ok(output.exit_code())
    }

    /// Runs a read-only git command and returns its trimmed stdout.
    pub async fn output(&self, args: &[&str], cwd: &Path) -> Result<String> {
        self.builder(cwd).args(args).output_trimmed().await
    }

    /// Lists the configured remotes (fetch entries).
    pub async fn remotes(&self, cwd: &Path) -> Result<Vec<Remote>> {
        let listing = self.output(&["remote", "-v"], cwd).await?;
        Ok(parse_remotes(&listing))
    }

    /// Resolves the fetch URL of a named remote.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RemoteNotFound` if the alias is not configured.
    pub async fn remote_url(&self, cwd: &Path, alias: &str) -> Result<String> {
        let remotes = self.remotes(cwd).await?;
        remotes
            .into_iter()
            .find(|r| r.name == alias)
            .map(|r| r.url)
            .ok_or_else(|| {
                GitError::RemoteNotFound {
                    remote: alias.to_string(),
                }
                .into()
            })
    }

    /// Fetches from a remote, retrying transient failures.
    pub async fn fetch(&self, cwd: &Path, remote: &str, policy: RetryPolicy) -> Result<()> {
        self.builder(cwd)
            .args(["fetch", remote])
            .run_with_retries(policy)
            .await
            .with_context(|| format!("failed to fetch {remote} in {}", cwd.display()))?;
        Ok(())
    }

    /// Clones `url` into a directory under `parent_dir`, retrying transient
    /// failures.
    pub async fn clone_into(&self, parent_dir: &Path, url: &str, policy: RetryPolicy) -> Result<()> {
        self.builder(parent_dir)
            .args(["clone", url])
            .run_with_retries(policy)
            .await
            .with_context(|| format!("failed to clone {url}"))?;
        Ok(())
    }

    /// Checks out a branch, tag, or commit.
    pub async fn checkout(&self, cwd: &Path, what: &str) -> Result<()> {
        self.run(&["-c", "advice.detachedHead=false", "checkout", what], cwd)
            .await
            .with_context(|| format!("failed to checkout {what} in {}", cwd.display()))
    }

    /// Creates a local branch tracking `<remote>/<branch>` and checks it out.
    pub async fn checkout_tracking(&self, cwd: &Path, branch: &str, remote: &str) -> Result<()> {
        let upstream = format!("{remote}/{branch}");
        self.run(&["checkout", "--track", "-b", branch, &upstream], cwd)
            .await
            .with_context(|| format!("failed to create tracking branch {branch} from {upstream}"))
    }

    /// Lists local branch names.
    pub async fn branches(&self, cwd: &Path) -> Result<Vec<String>> {
        let listing = self
            .output(&["branch", "--format=%(refname:short)"], cwd)
            .await?;
        Ok(parse_ref_lines(&listing))
    }

    /// Lists tag names.
    pub async fn tags(&self, cwd: &Path) -> Result<Vec<String>> {
        let listing = self.output(&["tag"], cwd).await?;
        Ok(parse_ref_lines(&listing))
    }

    /// Rebases onto `upstream`, tolerating failure. Returns the exit code.
    pub async fn rebase_allowed(&self, cwd: &Path, upstream: &str) -> Result<i32> {
        self.run_allowed(&["rebase", upstream], cwd).await
    }

    /// Rebases onto `upstream`, failing on conflict.
    pub async fn rebase(&self, cwd: &Path, upstream: &str) -> Result<()> {
        self.run(&["rebase", upstream], cwd)
            .await
            .with_context(|| format!("rebase onto {upstream} failed in {}", cwd.display()))
    }

    /// Stashes local modifications.
    pub async fn stash_push(&self, cwd: &Path) -> Result<()> {
        self.run(&["stash"], cwd).await
    }

    /// Restores stashed modifications.
    pub async fn stash_pop(&self, cwd: &Path) -> Result<()> {
        self.run(&["stash", "pop", "-q"], cwd).await
    }

    /// Returns the branch or tag name of the current workspace.
    ///
    /// Parses `git describe --all`, whose output is `heads/<branch>` or
    /// `tags/<tag>`.
    pub async fn describe_version(&self, cwd: &Path) -> Result<String> {
        let described = self.output(&["describe", "--all"], cwd).await?;
        described
            .split('/')
            .nth(1)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("unexpected describe output: {described}"))
    }

    /// Checks that git's branch coloring will not corrupt captured output.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BadGitColorConfig` when `color.branch` is set to
    /// "always".
    pub async fn assert_color_config(&self, cwd: &Path) -> Result<()> {
        // exit code 1 means the key is unset, which is fine
        let value = self
            .builder(cwd)
            .args(["config", "--get", "color.branch"])
            .output_trimmed()
            .await?;
        if value.contains("always") {
            return Err(ConfigError::BadGitColorConfig.into());
        }
        Ok(())
    }

    /// Exports a repository tree at `version` into `dest_dir`.
    ///
    /// Pipes `git archive [--prefix=<prefix>/] <version>` into
    /// `tar -x -C <dest_dir>`, mirroring what the tracked file set of the
    /// snapshot looks like on disk.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` if either side of the pipe exits
    /// non-zero.
    pub async fn export_tree(
        &self,
        tar: &Path,
        repo_dir: &Path,
        version: &str,
        prefix: Option<&str>,
        dest_dir: &Path,
    ) -> Result<()> {
        let mut archive_cmd = tokio::process::Command::new(&self.program);
        archive_cmd.current_dir(repo_dir).arg("archive");
        if let Some(prefix) = prefix {
            archive_cmd.arg(format!("--prefix={prefix}/"));
        }
        archive_cmd
            .arg(version)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            repo = %repo_dir.display(),
            version,
            prefix = prefix.unwrap_or(""),
            dest = %dest_dir.display(),
            "exporting tree"
        );

        let mut archive = archive_cmd
            .spawn()
            .with_context(|| format!("failed to spawn git archive in {}", repo_dir.display()))?;

        let archive_stdout = archive
            .stdout
            .take()
            .context("git archive stdout was not piped")?;
        let pipe: Stdio = archive_stdout
            .try_into()
            .context("failed to hand git archive output to tar")?;

        let mut extract = tokio::process::Command::new(tar)
            .arg("-x")
            .arg("-f")
            .arg("-")
            .arg("-C")
            .arg(dest_dir)
            .stdin(pipe)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn tar into {}", dest_dir.display()))?;

        let archive_status = archive.wait().await?;
        let extract_status = extract.wait().await?;

        if !archive_status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git archive {version}"),
                code: archive_status.code().unwrap_or(-1),
            }
            .into());
        }
        if !extract_status.success() {
            return Err(GitError::CommandFailed {
                command: format!("tar -x -C {}", dest_dir.display()),
                code: extract_status.code().unwrap_or(-1),
            }
            .into());
        }

        Ok(())
    }
}

/// Parses `git remote -v` output into fetch remotes.
fn parse_remotes(listing: &str) -> Vec<Remote> {
    listing
        .lines()
        .filter(|line| !line.contains("(push)"))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let url = parts.next()?;
            Some(Remote {
                name: name.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

/// Parses one ref name per line, dropping empty lines.
fn parse_ref_lines(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
