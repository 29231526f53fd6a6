//! `mailsift fetch`

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use mailsift_core::service::DEFAULT_HEADER_COLUMNS;
use mailsift_core::{QueryOptions, Settings, fetch_messages_as_table};
use mailsift_gmail::GmailClient;
use mailsift_oauth::{AuthorizedUser, GMAIL_READONLY_SCOPE};
use tracing::{debug, info, warn};

use crate::cli::{DEFAULT_TOKEN_PATH, FetchArgs};

pub async fn run(args: FetchArgs, settings: &Settings) -> Result<()> {
    let token_path = args
        .token
        .or_else(|| settings.token_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH));

    if !token_path.exists() {
        bail!(
            "Token file not found at {}. Run `mailsift auth` first to generate the token file.",
            token_path.display()
        );
    }
    debug!("Using token file: {}", token_path.display());
    debug!("Output file: {}", args.output.display());

    let mut user = AuthorizedUser::load(&token_path).context("reading token file")?;
    if !user.has_scopes(&[GMAIL_READONLY_SCOPE.to_string()]) {
        warn!("Token does not list the {GMAIL_READONLY_SCOPE} scope; requests may be rejected");
    }

    let was_valid = user.is_valid();
    let token = user
        .valid_token()
        .await
        .context("obtaining an access token")?;
    if !was_valid {
        user.save(&token_path).context("saving refreshed token")?;
    }

    let client = GmailClient::new(token.access_token);
    debug!("Gmail client ready at {}", client.base_url());

    let query = QueryOptions {
        last_days: args.last_days,
        after: args.after,
        before: args.before,
        query: args.query,
    }
    .build()?;
    info!("Fetching emails with query: {query}");

    let table = fetch_messages_as_table(&client, &query, DEFAULT_HEADER_COLUMNS)
        .await
        .context("fetching Gmail data")?;
    info!("Fetched {} emails", table.len());

    table.write_csv(&args.output)?;
    info!(
        "Successfully saved {} emails to {}",
        table.len(),
        args.output.display()
    );
    Ok(())
}
