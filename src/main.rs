// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config (files, env, flags) --> Command Dispatch
//!   Version | Options | Catalog | every fleet operation
//! ```

use std::process::ExitCode;

use booster_rs::cli::global::GlobalOptions;
use booster_rs::cli::{self, Command};
use booster_rs::cmd::catalog::run_catalog_command;
use booster_rs::cmd::config::run_options_command;
use booster_rs::cmd::fleet::{operation_for, run_fleet_command};
use booster_rs::config::Config;
use booster_rs::config::loader::ConfigLoader;
use booster_rs::logging::init_logging;
use booster_rs::logging::{LogConfig, LogLevel};
use tracing::debug;

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

fn console_level(global: &GlobalOptions) -> LogLevel {
    global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or_default()
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    LogConfig::builder()
        .with_console_level(console_level(global))
        .maybe_with_file_level(global.file_log_level.and_then(LogLevel::from_u8))
        .maybe_with_log_file(global.log_file.clone())
        .build()
}

fn show_progress(global: &GlobalOptions) -> bool {
    console_level(global).allows_progress()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Command::Version => {
            handle_version_command();
            Ok(())
        }
        Command::Options => load_config(&cli.global).map(|(config, files)| {
            run_options_command(&config, &files);
        }),
        Command::Catalog { base, qualifier } => match load_config(&cli.global) {
            Ok((config, _)) => run_catalog_command(&config, base, qualifier.as_deref()).await,
            Err(e) => Err(e),
        },
        command => match (operation_for(command), load_config(&cli.global)) {
            (Ok(Some(operation)), Ok((config, _))) => {
                run_fleet_command(&operation, &config, show_progress(&cli.global)).await
            }
            (Ok(None), _) => Ok(()),
            (Err(e), _) => Err(e.into()),
            (_, Err(e)) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional("booster.toml");
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix("BOOSTER")
}

/// Layered configuration plus the list of files it came from.
fn load_config(global: &GlobalOptions) -> booster_rs::error::Result<(Config, Vec<String>)> {
    let loader = build_config_loader(global);
    let files = loader.layers();
    for file in &files {
        debug!("config: {file}");
    }

    let mut config = loader.build()?;
    global.apply_to(&mut config);
    config.validate()?;
    Ok((config, files))
}
