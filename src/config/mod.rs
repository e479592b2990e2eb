// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for grove.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. grove.toml (cwd)
//! 3. --ini files
//! 4. GROVE_* env vars
//! 5. --set overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GROVE_REPO_ALIAS=upstream  → repo.alias = "upstream"
//! GROVE_RETRY_ATTEMPTS=3     → retry.attempts = 3
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

use loader::ConfigLoader;
use types::{GlobalConfig, RepoConfig, RetryConfig, ToolsConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Repository topology settings.
    pub repo: RepoConfig,
    /// Retry policy for flaky external commands.
    pub retry: RetryConfig,
    /// Tool paths.
    pub tools: ToolsConfig,
}

impl Config {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Format configuration options for display.
    ///
    /// Returns a vector of formatted strings representing all configuration
    /// options. Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert(
            "global.output_log_level".to_string(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".to_string(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".to_string(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );

        options.insert("repo.alias".to_string(), self.repo.alias.clone());
        options.insert("repo.project".to_string(), self.repo.project.clone());
        options.insert("repo.addons_dir".to_string(), self.repo.addons_dir.clone());
        options.insert(
            "repo.optional_descriptor".to_string(),
            self.repo.optional_descriptor.clone(),
        );

        options.insert(
            "retry.attempts".to_string(),
            self.retry.attempts.to_string(),
        );
        options.insert(
            "retry.delay_seconds".to_string(),
            self.retry.delay_seconds.to_string(),
        );

        options.insert("tools.git".to_string(), self.tools.git.display().to_string());
        options.insert("tools.mvn".to_string(), self.tools.mvn.display().to_string());
        options.insert("tools.tar".to_string(), self.tools.tar.display().to_string());

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
