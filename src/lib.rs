// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          clone / archive / exec
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!              repo          git    utility
//!          discovery/     CLI wrap  zip walk
//!          update/archive
//!                 |
//!                 v
//!   +-----------------------------------------+
//!   |  process   builder, runner, retry       |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, platform  |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod platform;
pub mod process;
pub mod repo;
pub mod utility;
