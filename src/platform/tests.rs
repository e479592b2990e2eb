// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use tempfile::TempDir;

#[cfg(not(windows))]
#[tokio::test]
async fn mapping_is_pass_through_off_windows() {
    let dir = TempDir::new().unwrap();
    let mapping = DriveMapping::acquire(dir.path()).await.unwrap();
    assert_eq!(mapping.root(), dir.path());
    mapping.release().await.unwrap();
}
