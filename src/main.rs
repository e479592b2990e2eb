// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Clone | Archive | Exec | Modules | Addons | Options | Inis | Version
//! ```
//!
//! A failed external command terminates the run with that command's exit
//! code, so callers scripting grove see the underlying failure.

use std::process::ExitCode;

use grove::cli::global::GlobalOptions;
use grove::cli::{self, Command};
use grove::cmd::config::{run_inis_command, run_options_command};
use grove::cmd::repo::{
    run_addons_command, run_archive_command, run_clone_command, run_exec_command,
    run_modules_command,
};
use grove::config::Config;
use grove::config::loader::ConfigLoader;
use grove::error::exit_code_of;
use grove::logging::init_logging;
use grove::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let base_dir = cli.global.working_dir();

    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            load_config(&cli.global).map(|config| run_options_command(&config))
        }
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::Clone(args)) => match load_config(&cli.global) {
            Ok(config) => run_clone_command(args, &config, &base_dir).await,
            Err(e) => Err(e),
        },
        Some(Command::Archive(args)) => match load_config(&cli.global) {
            Ok(config) => run_archive_command(args, &config, &base_dir).await,
            Err(e) => Err(e),
        },
        Some(Command::Exec(args)) => match load_config(&cli.global) {
            Ok(config) => run_exec_command(args, &config, &base_dir).await,
            Err(e) => Err(e),
        },
        Some(Command::Modules) => match load_config(&cli.global) {
            Ok(config) => run_modules_command(&config, &base_dir).await,
            Err(e) => Err(e),
        },
        Some(Command::Addons(args)) => match load_config(&cli.global) {
            Ok(config) => run_addons_command(args, &config, &base_dir).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            // surface the offending command's exit code when one is known
            exit_code_of(&e)
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .map_or(ExitCode::FAILURE, ExitCode::from)
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_inis {
        loader = loader.add_toml_file_optional("grove.toml");
    }
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix("GROVE")
}

fn load_config(global: &GlobalOptions) -> grove::error::Result<Config> {
    build_config_loader(global)
        .apply_overrides(global.to_config_overrides())
        .and_then(ConfigLoader::build)
        .map_err(|e| {
            eprintln!("Failed to load config: {e}");
            e
        })
}
