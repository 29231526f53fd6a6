//! One driver per subcommand.

mod auth;
mod fetch;
mod filter;
mod import;
mod transform;

use anyhow::Result;
use mailsift_core::Settings;

use crate::cli::Command;

/// Runs a parsed subcommand.
pub async fn run(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Fetch(args) => fetch::run(args, settings).await,
        Command::Filter(args) => filter::run(&args, settings),
        Command::Transform(args) => transform::run(&args, settings),
        Command::Import(args) => import::run(&args),
        Command::Auth(args) => auth::run(args, settings).await,
    }
}
