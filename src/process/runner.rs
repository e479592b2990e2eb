// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_retries(policy)
//!              |
//!              v
//!     build_command()
//!     args, cwd, env, stdio
//!              |
//!              v
//!          spawn()
//!              |
//!              v
//!     stream stdout/stderr
//!     (per-line, into tracing)
//!              |
//!              v
//!    validate exit_code
//!    (skip if ALLOW_FAILURE)
//!              |
//!              v
//!       ProcessOutput
//!    { exit_code, stdout, stderr }
//! ```

use crate::error::{ProcessError, Result};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use super::RetryPolicy;
use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.program().file_stem().map_or_else(
            || "process".to_string(),
            |s| s.to_string_lossy().into_owned(),
        )
    }

    /// Returns the full command line as a string (for logging).
    fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            use std::fmt::Write as _;
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// This is the main entry point for executing a process.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The process exits with a non-zero status (and `ALLOW_FAILURE` flag
    ///   is not set).
    /// - IO error occurs during output streaming.
    pub async fn run(self) -> Result<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let mut child = command
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;

        let pid = child.id();
        trace!(process = %name, pid = ?pid, "spawned");

        let output = self.run_child(&name, &mut child).await?;

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE)
            && !self.success_code_set().contains(&output.exit_code())
        {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
            }
            .into());
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Runs the process, retrying transient failures.
    ///
    /// Each non-zero exit within `policy.attempts` is tolerated and logged,
    /// with `policy.delay` between attempts. The attempt after the last
    /// tolerated failure runs with the caller's own flags, so the final
    /// failure either raises or is reported through the returned exit code.
    /// An always-failing command is attempted exactly `attempts + 1` times.
    ///
    /// # Errors
    ///
    /// Returns an error if the final attempt fails and `ALLOW_FAILURE` is
    /// not set, or if spawning fails at any point.
    pub async fn run_with_retries(self, policy: RetryPolicy) -> Result<ProcessOutput> {
        let cmd_line = self.command_line();

        for _retries in 0..policy.attempts {
            let attempt = self
                .clone()
                .flag(ProcessFlags::ALLOW_FAILURE)
                .run()
                .await?;
            if self.success_code_set().contains(&attempt.exit_code()) {
                return Ok(attempt);
            }
            warn!(
                cmd = %cmd_line,
                exit_code = attempt.exit_code(),
                delay = ?policy.delay,
                "command failed, retrying"
            );
            tokio::time::sleep(policy.delay).await;
        }

        self.run().await
    }

    /// Runs the process expecting textual stdout, and returns it trimmed.
    ///
    /// The exit code is not inspected; stderr content is logged as a warning
    /// without stopping execution.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned or its output
    /// cannot be read.
    pub async fn output_trimmed(self) -> Result<String> {
        let name = self.display_name();
        let output = self
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE)
            .run()
            .await?;
        if !output.stderr().is_empty() {
            warn!(process = %name, stderr = %output.stderr(), "command wrote to stderr");
        }
        Ok(output.stdout().trim_end().to_string())
    }

    /// Runs the child process, handling I/O streaming and waiting for completion.
    async fn run_child(&self, name: &str, child: &mut Child) -> Result<ProcessOutput> {
        let stdout_handle =
            spawn_stream_reader(child.stdout.take(), self.stdout_config(), name, "stdout");
        let stderr_handle =
            spawn_stream_reader(child.stderr.take(), self.stderr_config(), name, "stderr");

        let exit_status = child.wait().await?;

        let stdout = await_reader(stdout_handle).await;
        let stderr = await_reader(stderr_handle).await;

        Ok(ProcessOutput::new(
            exit_status.code().unwrap_or(-1),
            stdout,
            stderr,
        ))
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        for (key, value) in self.environment() {
            command.env(key, value);
        }

        command.stdin(Stdio::null());
        command.stdout(stdio_from_flags(self.stdout_config()));
        command.stderr(stdio_from_flags(self.stderr_config()));

        // Kill on drop for safety
        command.kill_on_drop(true);

        command
    }
}

/// Converts `StreamFlags` to Stdio configuration.
///
/// A pipe is only opened when a reader task will drain it; anything else
/// gets the bit bucket so a chatty child can never block on a full pipe.
fn stdio_from_flags(flags: StreamFlags) -> Stdio {
    if flags.contains(StreamFlags::INHERIT) {
        Stdio::inherit()
    } else if flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        Stdio::piped()
    } else {
        Stdio::null()
    }
}

/// Spawns a task reading a piped stream line by line.
///
/// Lines are forwarded to tracing when `FORWARD_TO_LOG` is set and collected
/// into the returned string when `KEEP_IN_STRING` is set.
fn spawn_stream_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<String>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    let name = process_name.to_string();
    stream.map(|stream| {
        tokio::spawn(async move {
            let mut collected = String::new();
            let mut lines = BufReader::new(stream).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %name, stream = %stream_name, line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    if !collected.is_empty() {
                        collected.push('\n');
                    }
                    collected.push_str(&line);
                }
            }
            collected
        })
    })
}

/// Waits for a reader task and returns its collected output.
async fn await_reader(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}
