// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for grove.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, RepoConfig, RetryConfig, ToolsConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file (empty = console only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Repository topology settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Remote alias used to resolve module and addon URLs.
    pub alias: String,
    /// Name of the parent project; a remote URL ending in `/<project>.git`
    /// marks an online remote, anything else an offline mirror.
    pub project: String,
    /// Subdirectory holding addon repositories.
    pub addons_dir: String,
    /// Alternate build descriptor enumerating optional addons.
    pub optional_descriptor: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            alias: "origin".to_string(),
            project: "grove".to_string(),
            addons_dir: "addons".to_string(),
            optional_descriptor: "pom-optionals.xml".to_string(),
        }
    }
}

/// Retry policy for flaky external commands (fetches, clones).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Number of tolerated failures before the final attempt.
    pub attempts: u32,
    /// Pause between attempts, in seconds.
    pub delay_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay_seconds: 10,
        }
    }
}

impl RetryConfig {
    /// Pause between attempts as a `Duration`.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }
}

/// Tool paths configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Git executable.
    pub git: PathBuf,
    /// Maven executable, used for effective-POM introspection.
    pub mvn: PathBuf,
    /// Tar executable, used as the extraction side of `git archive` pipes.
    pub tar: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: PathBuf::from("git"),
            mvn: PathBuf::from("mvn"),
            tar: PathBuf::from("tar"),
        }
    }
}
