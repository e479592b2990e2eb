// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing and the CLI-to-config pipeline.

use clap::Parser;
use grove::cli::{Cli, Command};
use grove::config::Config;
use grove::config::loader::ConfigLoader;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Command parsing
// =============================================================================

#[test]
fn cli_clone_defaults() {
    let cli = Cli::try_parse_from(["grove", "clone"]).unwrap();
    let Some(Command::Clone(args)) = cli.command else {
        panic!("expected clone");
    };
    assert!(args.version.is_none());
    assert!(!args.with_optionals);
}

#[test]
fn cli_archive_requires_destination() {
    assert!(Cli::try_parse_from(["grove", "archive"]).is_err());
}

#[test]
fn cli_exec_mixed_with_globals() {
    let cli = Cli::try_parse_from([
        "grove",
        "-d",
        "/work/parent",
        "exec",
        "--with-optionals",
        "git",
        "status",
    ])
    .unwrap();
    let Some(Command::Exec(args)) = cli.command else {
        panic!("expected exec");
    };
    assert!(args.with_optionals);
    assert_eq!(args.command, ["git", "status"]);
    assert_eq!(
        cli.global.working_dir(),
        std::path::PathBuf::from("/work/parent")
    );
}

#[test]
fn cli_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["grove", "frobnicate"]).is_err());
}

// =============================================================================
// CLI options flowing into the configuration
// =============================================================================

#[test]
fn cli_overrides_reach_the_config() {
    let cli = Cli::try_parse_from([
        "grove",
        "--set",
        "repo.alias=upstream",
        "--set",
        "retry.attempts=2",
        "-l",
        "5",
        "options",
    ])
    .unwrap();

    let config = ConfigLoader::new()
        .apply_overrides(cli.global.to_config_overrides())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.repo.alias, "upstream");
    assert_eq!(config.retry.attempts, 2);
    assert_eq!(config.global.output_log_level.as_u8(), 5);
    assert_eq!(config.global.file_log_level.as_u8(), 5);
}

#[test]
fn ini_file_layering_last_file_wins() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base.toml");
    let extra = dir.path().join("extra.toml");
    fs::write(&base, "[repo]\nalias = \"mirror\"\nproject = \"acme\"\n").unwrap();
    fs::write(&extra, "[repo]\nalias = \"upstream\"\n").unwrap();

    let config = ConfigLoader::new()
        .add_toml_file(&base)
        .add_toml_file(&extra)
        .build()
        .unwrap();

    assert_eq!(config.repo.alias, "upstream");
    assert_eq!(config.repo.project, "acme");
}

#[test]
fn cli_set_beats_ini_file() {
    let dir = TempDir::new().unwrap();
    let ini = dir.path().join("grove.toml");
    fs::write(&ini, "[retry]\nattempts = 5\n").unwrap();

    let cli = Cli::try_parse_from(["grove", "--set", "retry.attempts=1", "options"]).unwrap();
    let config = ConfigLoader::new()
        .add_toml_file(&ini)
        .apply_overrides(cli.global.to_config_overrides())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.retry.attempts, 1);
}

#[test]
fn default_config_round_trips_through_options_listing() {
    let config = Config::default();
    let listing = config.format_options();
    assert!(listing.iter().any(|line| line.contains("repo.alias")));
    assert!(listing.iter().any(|line| line.contains("origin")));
}
