// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_bounds() {
    assert_eq!(LogLevel::from_u8(0), Some(LogLevel::SILENT));
    assert_eq!(LogLevel::from_u8(3), Some(LogLevel::INFO));
    assert_eq!(LogLevel::from_u8(5), Some(LogLevel::TRACE));
    assert_eq!(LogLevel::from_u8(6), None);
    assert!(LogLevel::new(9).is_err());
}

#[test]
fn test_log_level_filter_strings() {
    let directives: Vec<&str> = (0..=5)
        .map(|n| LogLevel::new(n).unwrap().to_filter_string())
        .collect();
    insta::assert_debug_snapshot!(
        directives,
        @r#"
    [
        "off",
        "error",
        "warn",
        "info",
        "debug",
        "trace",
    ]
    "#
    );
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(!config.show_target());
}

#[test]
fn test_log_config_builder() {
    let config = LogConfig::builder()
        .with_console_level(LogLevel::DEBUG)
        .with_file_level(LogLevel::TRACE)
        .with_log_file("grove.log".to_string())
        .build();
    assert_eq!(config.console_level(), LogLevel::DEBUG);
    assert_eq!(config.log_file(), Some("grove.log"));
}
