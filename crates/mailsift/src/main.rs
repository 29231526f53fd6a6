//! `mailsift` - Gmail export and job application sifting
//!
//! Fetches mail through the Gmail API (or reads mbox archives) into CSV
//! files, then filters them by keyword or label.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod report;

use std::process::ExitCode;

use clap::Parser;
use mailsift_core::Settings;
use tracing::{debug, error};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    ["mailsift", "mailsift_core", "mailsift_gmail", "mailsift_oauth", "mailsift_mime"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.command.verbose());

    let settings_path = cli.settings.unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&settings_path);
    debug!("Settings: {settings:?}");

    match commands::run(cli.command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
