// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for repository update and archival.
//!
//! Exercises the real git command line against scratch repositories.

use std::fs;
use std::path::{Path, PathBuf};

use grove::config::Config;
use grove::git::Git;
use grove::repo::Repository;
use grove::utility::zip::extract_zip;
use tempfile::TempDir;

fn git() -> Git {
    Git::new("git")
}

async fn run_git(args: &[&str], cwd: &Path) {
    git().run(args, cwd).await.expect("git command failed");
}

/// Initializes a repository with one commit on `main`.
async fn init_repo(path: &Path) {
    run_git(&["init", "-b", "main"], path).await;
    run_git(&["config", "user.email", "dev@example.com"], path).await;
    run_git(&["config", "user.name", "Dev"], path).await;
    fs::write(path.join("README.md"), "upstream\n").unwrap();
    run_git(&["add", "."], path).await;
    run_git(&["commit", "-m", "initial"], path).await;
}

/// Clones `upstream` into `parent`, returning the clone's directory.
async fn clone_repo(upstream: &Path, parent: &Path) -> PathBuf {
    run_git(
        &["clone", &upstream.to_string_lossy(), "work"],
        parent,
    )
    .await;
    parent.join("work")
}

async fn open_repository(dir: &Path) -> Repository {
    Repository::open(dir, &Config::default())
        .await
        .expect("failed to open repository")
}

#[tokio::test]
async fn reconcile_tag_checks_out_without_branch_setup() {
    let upstream = TempDir::new().unwrap();
    init_repo(upstream.path()).await;
    run_git(&["tag", "release-1.0"], upstream.path()).await;

    let work_parent = TempDir::new().unwrap();
    let work = clone_repo(upstream.path(), work_parent.path()).await;

    let repo = open_repository(&work).await;
    repo.reconcile_version(&work, "release-1.0").await.unwrap();

    // detached at the tag, no local branch named after it
    assert_eq!(git().describe_version(&work).await.unwrap(), "release-1.0");
    let branches = git().branches(&work).await.unwrap();
    assert!(!branches.contains(&"release-1.0".to_string()));
}

#[tokio::test]
async fn reconcile_unknown_name_creates_tracking_branch() {
    let upstream = TempDir::new().unwrap();
    init_repo(upstream.path()).await;
    // the release branch gets its own commit so describe is unambiguous
    run_git(&["checkout", "-b", "release"], upstream.path()).await;
    fs::write(upstream.path().join("release.txt"), "release\n").unwrap();
    run_git(&["add", "."], upstream.path()).await;
    run_git(&["commit", "-m", "release work"], upstream.path()).await;
    run_git(&["checkout", "main"], upstream.path()).await;

    let work_parent = TempDir::new().unwrap();
    let work = clone_repo(upstream.path(), work_parent.path()).await;

    let repo = open_repository(&work).await;
    repo.reconcile_version(&work, "release").await.unwrap();

    assert_eq!(git().describe_version(&work).await.unwrap(), "release");
    let branches = git().branches(&work).await.unwrap();
    assert!(branches.contains(&"release".to_string()));
}

#[tokio::test]
async fn reconcile_existing_branch_rebases_onto_remote() {
    let upstream = TempDir::new().unwrap();
    init_repo(upstream.path()).await;

    let work_parent = TempDir::new().unwrap();
    let work = clone_repo(upstream.path(), work_parent.path()).await;

    // upstream advances after the clone
    fs::write(upstream.path().join("new.txt"), "upstream change\n").unwrap();
    run_git(&["add", "."], upstream.path()).await;
    run_git(&["commit", "-m", "advance"], upstream.path()).await;

    run_git(&["fetch", "origin"], &work).await;
    let repo = open_repository(&work).await;
    repo.reconcile_version(&work, "main").await.unwrap();

    assert!(work.join("new.txt").is_file());
    assert_eq!(git().describe_version(&work).await.unwrap(), "main");
}

#[tokio::test]
async fn reconcile_dirty_workspace_stashes_and_restores() {
    let upstream = TempDir::new().unwrap();
    init_repo(upstream.path()).await;

    let work_parent = TempDir::new().unwrap();
    let work = clone_repo(upstream.path(), work_parent.path()).await;

    // upstream edits README while the workspace has an uncommitted edit to
    // a different file, which makes the first rebase refuse to run
    fs::write(upstream.path().join("README.md"), "upstream v2\n").unwrap();
    run_git(&["commit", "-am", "edit readme"], upstream.path()).await;

    fs::write(work.join("local.txt"), "local only\n").unwrap();
    run_git(&["add", "local.txt"], &work).await;

    run_git(&["fetch", "origin"], &work).await;
    let repo = open_repository(&work).await;
    repo.reconcile_version(&work, "main").await.unwrap();

    // the upstream edit landed and the local modification survived
    assert_eq!(
        fs::read_to_string(work.join("README.md")).unwrap(),
        "upstream v2\n"
    );
    assert_eq!(
        fs::read_to_string(work.join("local.txt")).unwrap(),
        "local only\n"
    );
}

#[tokio::test]
async fn update_one_clones_missing_repository() {
    let upstream_root = TempDir::new().unwrap();
    let module_upstream = upstream_root.path().join("core");
    fs::create_dir_all(&module_upstream).unwrap();
    init_repo(&module_upstream).await;
    run_git(&["tag", "release-1.0"], &module_upstream).await;

    // parent repository whose offline mirror root is the upstream directory
    let parent = TempDir::new().unwrap();
    init_repo(parent.path()).await;
    run_git(
        &[
            "remote",
            "add",
            "origin",
            &upstream_root.path().to_string_lossy(),
        ],
        parent.path(),
    )
    .await;

    let repo = open_repository(parent.path()).await;
    assert_eq!(
        repo.module_url("core"),
        format!("{}/core", upstream_root.path().display())
    );
    repo.update_one("core", "release-1.0", &repo.module_url("core"), parent.path())
        .await
        .unwrap();

    let module_dir = parent.path().join("core");
    assert!(module_dir.join("README.md").is_file());
    assert_eq!(
        git().describe_version(&module_dir).await.unwrap(),
        "release-1.0"
    );
}

#[tokio::test]
async fn archive_stages_parent_and_modules_then_cleans_up() {
    let parent = TempDir::new().unwrap();
    init_repo(parent.path()).await;
    fs::write(parent.path().join("pom.xml"), "<project/>\n").unwrap();
    run_git(&["add", "."], parent.path()).await;
    run_git(&["commit", "-m", "descriptor"], parent.path()).await;
    run_git(&["tag", "release-1.0"], parent.path()).await;
    run_git(
        &["remote", "add", "origin", "/mirror/repos"],
        parent.path(),
    )
    .await;

    // nested module repository, untracked by the parent
    let core = parent.path().join("core");
    fs::create_dir_all(&core).unwrap();
    run_git(&["init", "-b", "main"], &core).await;
    run_git(&["config", "user.email", "dev@example.com"], &core).await;
    run_git(&["config", "user.name", "Dev"], &core).await;
    fs::write(core.join("core.txt"), "core sources\n").unwrap();
    run_git(&["add", "."], &core).await;
    run_git(&["commit", "-m", "initial"], &core).await;
    run_git(&["tag", "release-1.0"], &core).await;

    let out = TempDir::new().unwrap();
    let archive = out.path().join("out.zip");

    let mut repo = open_repository(parent.path()).await;
    repo.set_modules(vec!["core".to_string()]);
    repo.set_addons(vec![]);
    repo.archive(&archive, Some("release-1.0"), false)
        .await
        .unwrap();

    assert!(archive.is_file());
    // the staging directory is gone afterwards
    assert!(!out.path().join("sources").exists());

    let extracted = TempDir::new().unwrap();
    extract_zip(&archive, extracted.path()).unwrap();
    assert_eq!(
        fs::read_to_string(extracted.path().join("pom.xml")).unwrap(),
        "<project/>\n"
    );
    assert_eq!(
        fs::read_to_string(extracted.path().join("core/core.txt")).unwrap(),
        "core sources\n"
    );
    // no addons were archived, so no addons directory exists
    assert!(!extracted.path().join("addons").exists());
}
