// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env() .capture_stdout()
//!   .run() / .run_with_retries(policy) / .output_trimmed()
//!       --> tokio::process::Command
//!           stream stdout/stderr line by line
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```
//!
//! Execution is strictly sequential: every call awaits child completion
//! before returning.

pub mod builder;
mod runner;

pub use builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};

use std::time::Duration;

use crate::config::types::RetryConfig;

/// Policy for [`ProcessBuilder::run_with_retries`].
///
/// A command is re-run after each non-zero exit, up to `attempts` tolerated
/// failures with `delay` between them; the attempt after the last tolerated
/// failure carries the caller's own fail/tolerate flags.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Number of tolerated failures before the final attempt.
    pub attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_secs(10),
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(cfg: RetryConfig) -> Self {
        Self {
            attempts: cfg.attempts,
            delay: cfg.delay(),
        }
    }
}
