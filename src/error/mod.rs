// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//! Sub-errors, carried through anyhow chains:
//!   Git     CommandFailed, RemoteNotFound
//!   Config  InvalidValue, BadGitColorConfig
//!   Process ExecutableNotFound, SpawnFailed, NonZeroExit
//!   Fs      NotFound
//!
//! exit_code_of() walks a chain and recovers the child exit code
//! so main can terminate with the offending command's status.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed with code {code}: {command}")]
    CommandFailed { command: String, code: i32 },

    /// Remote not found.
    #[error("remote not found: {remote}")]
    RemoteNotFound { remote: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Git is configured in a way that would corrupt captured output.
    #[error(
        "the git color mode must not be 'always', try:\n \
         git config --global color.branch auto\n \
         git config --global color.status auto"
    )]
    BadGitColorConfig,
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },
}

impl ProcessError {
    /// Exit code carried by this error, if any.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),
}

/// Extract the child exit code from an error chain, if one is present.
///
/// Used by `main` to terminate the run with the offending command's code.
#[must_use]
pub fn exit_code_of(err: &anyhow::Error) -> Option<i32> {
    for cause in err.chain() {
        if let Some(pe) = cause.downcast_ref::<ProcessError>()
            && let Some(code) = pe.exit_code()
        {
            return Some(code);
        }
        if let Some(ge) = cause.downcast_ref::<GitError>()
            && let GitError::CommandFailed { code, .. } = ge
        {
            return Some(*code);
        }
    }
    None
}

#[cfg(test)]
mod tests;
