// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::zip::{ZipMode, extract_zip, make_zip};
use super::*;
use std::fs;
use tempfile::TempDir;

/// Seeds `root/base` with a small tree including a hidden file and an
/// empty directory.
fn seed_tree(root: &Path, base: &str) {
    let tree = root.join(base);
    fs::create_dir_all(tree.join("sub")).unwrap();
    fs::create_dir_all(tree.join("empty")).unwrap();
    fs::write(tree.join("file.txt"), "top level\n").unwrap();
    fs::write(tree.join(".hidden"), "still archived\n").unwrap();
    fs::write(tree.join("sub/nested.txt"), "nested\n").unwrap();
}

#[test]
fn zip_round_trip_preserves_tree() {
    let dir = TempDir::new().unwrap();
    seed_tree(dir.path(), "project");
    let archive = dir.path().join("project.zip");

    make_zip(&archive, dir.path(), Path::new("project"), ZipMode::Create).unwrap();

    let out = TempDir::new().unwrap();
    extract_zip(&archive, out.path()).unwrap();

    let extracted = out.path().join("project");
    assert_eq!(
        fs::read_to_string(extracted.join("file.txt")).unwrap(),
        "top level\n"
    );
    assert_eq!(
        fs::read_to_string(extracted.join(".hidden")).unwrap(),
        "still archived\n"
    );
    assert_eq!(
        fs::read_to_string(extracted.join("sub/nested.txt")).unwrap(),
        "nested\n"
    );
    assert!(extracted.join("empty").is_dir());
}

#[test]
fn make_zip_append_extends_archive() {
    let dir = TempDir::new().unwrap();
    seed_tree(dir.path(), "first");
    fs::create_dir_all(dir.path().join("second")).unwrap();
    fs::write(dir.path().join("second/extra.txt"), "appended\n").unwrap();
    let archive = dir.path().join("combined.zip");

    make_zip(&archive, dir.path(), Path::new("first"), ZipMode::Create).unwrap();
    make_zip(&archive, dir.path(), Path::new("second"), ZipMode::Append).unwrap();

    let out = TempDir::new().unwrap();
    extract_zip(&archive, out.path()).unwrap();
    assert!(out.path().join("first/file.txt").is_file());
    assert_eq!(
        fs::read_to_string(out.path().join("second/extra.txt")).unwrap(),
        "appended\n"
    );
}

#[test]
fn make_zip_missing_base_dir_fails() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("missing.zip");
    let err = make_zip(&archive, dir.path(), Path::new("nowhere"), ZipMode::Create).unwrap_err();
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn remove_dir_if_exists_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("staging");
    fs::create_dir_all(target.join("inner")).unwrap();
    fs::write(target.join("inner/file"), "x").unwrap();

    remove_dir_if_exists(&target).unwrap();
    assert!(!target.exists());
    // second removal is a no-op
    remove_dir_if_exists(&target).unwrap();
}
