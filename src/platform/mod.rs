// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Platform-specific workarounds.
//!
//! Windows caps paths at 260 characters, which deeply nested module trees
//! exceed. [`DriveMapping`] shortens the prefix by mapping the working
//! directory onto a free drive letter with `subst`, so all child processes
//! operate from `X:\` instead of the long real path. On other platforms the
//! mapping is a transparent pass-through.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

#[cfg(test)]
mod tests;

/// Drive letters eligible for a `subst` mapping.
#[cfg(windows)]
const CANDIDATE_DRIVES: std::ops::RangeInclusive<u8> = b'G'..=b'Z';

/// Settle time after `subst` before the mapping is reliably visible.
#[cfg(windows)]
const SUBST_SETTLE: std::time::Duration = std::time::Duration::from_secs(10);

/// A working directory, possibly remapped to a short drive-letter root.
#[derive(Debug)]
pub struct DriveMapping {
    root: PathBuf,
    #[cfg_attr(not(windows), allow(dead_code))]
    drive: Option<String>,
}

impl DriveMapping {
    /// Maps `dir` for long-path-safe access.
    ///
    /// On Windows this picks a free drive letter between G: and Z:, maps it
    /// onto `dir` with `subst`, and waits for the mapping to settle. On
    /// other platforms `dir` is used as-is.
    ///
    /// # Errors
    ///
    /// Fails on Windows when no drive letter is free or `subst` fails.
    pub async fn acquire(dir: &Path) -> Result<Self> {
        #[cfg(windows)]
        {
            use crate::process::ProcessBuilder;

            let Some(letter) = free_drive_letter() else {
                anyhow::bail!("no free drive letter between G: and Z: for subst");
            };
            let drive = format!("{letter}:");
            debug!(%drive, dir = %dir.display(), "mapping drive");
            ProcessBuilder::new("subst")
                .arg(&drive)
                .arg(dir)
                .run()
                .await?;
            tokio::time::sleep(SUBST_SETTLE).await;
            Ok(Self {
                root: PathBuf::from(format!("{drive}\\")),
                drive: Some(drive),
            })
        }
        #[cfg(not(windows))]
        {
            debug!(dir = %dir.display(), "no drive mapping needed");
            Ok(Self {
                root: dir.to_path_buf(),
                drive: None,
            })
        }
    }

    /// Root to operate from while the mapping is held.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Releases the mapping.
    pub async fn release(mut self) -> Result<()> {
        #[cfg(windows)]
        if let Some(drive) = self.drive.take() {
            use crate::process::ProcessBuilder;

            debug!(%drive, "releasing drive mapping");
            ProcessBuilder::new("subst")
                .arg(&drive)
                .arg("/D")
                .run()
                .await?;
        }
        self.drive = None;
        Ok(())
    }
}

#[cfg(windows)]
impl Drop for DriveMapping {
    fn drop(&mut self) {
        // fallback for early returns; release() is the normal path
        if let Some(drive) = self.drive.take() {
            let _ = std::process::Command::new("subst")
                .arg(&drive)
                .arg("/D")
                .status();
        }
    }
}

/// First drive letter between G: and Z: with no filesystem behind it.
#[cfg(windows)]
fn free_drive_letter() -> Option<char> {
    CANDIDATE_DRIVES
        .map(char::from)
        .find(|letter| !Path::new(&format!("{letter}:\\")).exists())
}
