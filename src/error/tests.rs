// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitError, ProcessError, exit_code_of};

#[test]
fn test_command_failed_display() {
    let err = GitError::CommandFailed {
        command: "git rebase origin/main".to_string(),
        code: 128,
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"git command failed with code 128: git rebase origin/main"
    );
}

#[test]
fn test_exit_code_from_process_error() {
    let err = anyhow::Error::new(ProcessError::NonZeroExit {
        command: "mvn -N help:effective-pom".to_string(),
        code: 7,
    })
    .context("discovery failed");
    assert_eq!(exit_code_of(&err), Some(7));
}

#[test]
fn test_exit_code_from_git_error() {
    let err = anyhow::Error::new(GitError::CommandFailed {
        command: "git fetch origin".to_string(),
        code: 128,
    });
    assert_eq!(exit_code_of(&err), Some(128));
}

#[test]
fn test_exit_code_absent() {
    let err = anyhow::anyhow!("plain failure");
    assert_eq!(exit_code_of(&err), None);
}
