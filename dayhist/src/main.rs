// dayhist/src/main.rs
//! dayhist entry point.
//!
//! Loads `.env`, parses arguments, initializes logging and dispatches to the
//! selected command.

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use std::io;
use std::process::ExitCode;

use dayhist::cli::{Cli, Commands};
use dayhist::commands::{compute, dates, run, validate};
use dayhist::logger;
use dayhist::ui::output_format::{error_msg, warn_msg};
use dayhist::ui::theme::{default_theme_map, ThemeMap};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);
    info!("dayhist started. Version: {}", env!("CARGO_PKG_VERSION"));

    let theme = default_theme_map();
    match dispatch(cli.command, &theme).await {
        Ok(code) => code,
        Err(e) => {
            error_msg(format!("{:#}", e), &theme);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Commands, theme: &ThemeMap) -> Result<ExitCode> {
    match command {
        Commands::Dates(cmd) => {
            dates::run_dates(&mut io::stdout().lock(), cmd.range.into(), cmd.date, cmd.since)?;
        }
        Commands::Compute(cmd) => {
            let opts = compute::ComputeOptions {
                config: cmd.config,
                store: cmd.store,
                registry: cmd.registry,
                date: cmd.date,
                json: cmd.json,
            };
            let results = compute::run_compute(opts, &mut io::stdout(), theme).await?;
            let failed = results.iter().filter(|r| r.result.is_err()).count();
            if failed > 0 {
                warn_msg(format!("{} of {} sensors failed", failed, results.len()), theme);
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Validate(cmd) => {
            validate::run_validate(&cmd.config, &cmd.registry, theme)?;
        }
        Commands::Run(cmd) => {
            run::run_schedulers(run::RunOptions {
                config: cmd.config,
                store: cmd.store,
                registry: cmd.registry,
                state_file: cmd.state_file,
            })
            .await?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
