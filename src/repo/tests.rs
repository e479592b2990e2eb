// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use crate::config::Config;
use crate::git::Git;
use std::fs;
use tempfile::TempDir;

const EFFECTIVE_POM: &str = "\
[INFO] Scanning for projects...
[INFO] --- help:3.4.0:effective-pom (default-cli) @ parent ---
<project>
  <modules>
    <module>core</module>
    <module>runtime</module>
    <!-- disabled: <module>sandbox</module> is commented out upstream -->
    <module>web</module>
  </modules>
</project>
[INFO] BUILD SUCCESS";

#[test]
fn parse_module_lines_keeps_output_order() {
    let modules = parse_module_lines(EFFECTIVE_POM);
    assert_eq!(modules, vec!["core", "runtime", "web"]);
}

#[test]
fn parse_module_lines_requires_line_start() {
    // the pattern is anchored, so commented-out modules never match
    assert!(parse_module_lines("  text <module>x</module>").is_empty());
    assert_eq!(parse_module_lines("  <module>x</module>  "), vec!["x"]);
}

#[test]
fn parse_module_lines_empty_output() {
    assert!(parse_module_lines("").is_empty());
    assert!(parse_module_lines("[INFO] BUILD SUCCESS").is_empty());
}

/// Git-initialized directory with the given remote URL under `origin`.
async fn repo_with_remote(url: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let g = Git::new("git");
    g.run(&["init", "-b", "main"], dir.path()).await.unwrap();
    g.run(&["remote", "add", "origin", url], dir.path())
        .await
        .unwrap();
    dir
}

#[tokio::test]
async fn online_remote_derives_sibling_urls() {
    let dir = repo_with_remote("https://git.example.com/org/grove.git").await;
    let repo = Repository::open(dir.path(), &Config::default()).await.unwrap();

    assert!(repo.is_online());
    assert_eq!(repo.module_url("core"), "https://git.example.com/org/core.git");
    // online addons live next to the modules
    assert_eq!(repo.addon_url("extra"), "https://git.example.com/org/extra.git");
}

#[tokio::test]
async fn offline_mirror_derives_nested_urls() {
    let dir = repo_with_remote("/mnt/mirror/repos").await;
    let repo = Repository::open(dir.path(), &Config::default()).await.unwrap();

    assert!(!repo.is_online());
    assert_eq!(repo.module_url("core"), "/mnt/mirror/repos/core");
    assert_eq!(repo.addon_url("extra"), "/mnt/mirror/repos/addons/extra");
}

#[tokio::test]
async fn seeded_lists_skip_discovery() {
    let dir = repo_with_remote("/mnt/mirror/repos").await;
    let mut repo = Repository::open(dir.path(), &Config::default()).await.unwrap();

    repo.set_modules(vec!["core".to_string()]);
    repo.set_addons(vec![]);

    // no maven available here; the cached lists answer directly
    assert_eq!(repo.modules().await.unwrap(), ["core".to_string()]);
    assert!(repo.addons(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn for_each_visits_every_repository() {
    let dir = repo_with_remote("/mnt/mirror/repos").await;
    fs::create_dir_all(dir.path().join("core")).unwrap();
    fs::create_dir_all(dir.path().join("addons/extra")).unwrap();

    let mut repo = Repository::open(dir.path(), &Config::default()).await.unwrap();
    repo.set_modules(vec!["core".to_string()]);
    repo.set_addons(vec!["extra".to_string()]);

    #[cfg(not(windows))]
    let command = "touch visited";
    #[cfg(windows)]
    let command = "New-Item -ItemType File visited";
    repo.for_each(command, false).await.unwrap();

    assert!(dir.path().join("visited").is_file());
    assert!(dir.path().join("core/visited").is_file());
    assert!(dir.path().join("addons/extra/visited").is_file());
}
