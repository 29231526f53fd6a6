//! `mailsift auth`: installed-app consent flow with a pasted code.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use mailsift_core::Settings;
use mailsift_oauth::{AuthorizationCodeFlow, AuthorizedUser, ClientSecrets};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::cli::{AuthArgs, DEFAULT_CREDENTIALS_PATH, DEFAULT_TOKEN_PATH};

pub async fn run(args: AuthArgs, settings: &Settings) -> Result<()> {
    let token_path = args
        .token_path
        .clone()
        .or_else(|| settings.token_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH));
    let credentials_path = args
        .credentials_path
        .clone()
        .or_else(|| settings.credentials_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));

    if reuse_existing_token(&token_path, &args.scopes).await? {
        return Ok(());
    }

    let secrets = ClientSecrets::load(&credentials_path)
        .with_context(|| format!("reading client secrets {}", credentials_path.display()))?;
    let client = secrets
        .oauth_client(&args.scopes)?
        .with_redirect_uri(&args.redirect_uri);
    let flow = AuthorizationCodeFlow::new(client).with_pkce();

    let url = flow.authorization_url(Some(args.scopes.as_slice()), None)?;
    println!("Go to this URL to authorize the app: {url}");
    if !args.no_browser {
        if let Err(e) = opener::open(url.as_str()) {
            debug!("Could not open a browser: {e}");
        }
    }

    let code = read_code(&mut BufReader::new(tokio::io::stdin())).await?;
    let token = flow
        .exchange_code(&code, None)
        .await
        .context("exchanging the authorization code")?;

    let user = AuthorizedUser::from_token(flow.client(), &token, &args.scopes);
    user.save(&token_path)?;
    println!("Token saved to {}", token_path.display());
    Ok(())
}

/// Keeps a valid token or refreshes an expired one in place.
///
/// Returns false when a new consent is needed.
async fn reuse_existing_token(token_path: &Path, scopes: &[String]) -> Result<bool> {
    if !token_path.exists() {
        return Ok(false);
    }

    let mut user = match AuthorizedUser::load(token_path) {
        Ok(user) => user,
        Err(e) => {
            warn!("Ignoring unreadable token file: {e}");
            return Ok(false);
        }
    };

    if !user.has_scopes(scopes) {
        info!("Stored token lacks the requested scopes; authorizing again");
        return Ok(false);
    }

    if user.is_valid() {
        println!("Token at {} is still valid", token_path.display());
        return Ok(true);
    }

    if user.refresh_token.is_none() {
        return Ok(false);
    }

    match user.refresh().await {
        Ok(_) => {
            user.save(token_path)?;
            println!("Token refreshed and saved to {}", token_path.display());
            Ok(true)
        }
        Err(e) => {
            warn!("Token refresh failed, authorizing again: {e}");
            Ok(false)
        }
    }
}

/// Prompts for and reads the authorization code.
async fn read_code<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<String> {
    print!("Enter the authorization code: ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut line = String::new();
    reader.read_line(&mut line).await?;
    let code = line.trim();
    if code.is_empty() {
        bail!("No authorization code entered");
    }
    Ok(code.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_read_code_trims() {
        let mut reader = BufReader::new(Builder::new().read(b"  4/0Abc-def \n").build());
        assert_eq!(read_code(&mut reader).await.unwrap(), "4/0Abc-def");
    }

    #[tokio::test]
    async fn test_read_code_rejects_empty() {
        let mut reader = BufReader::new(Builder::new().read(b"\n").build());
        assert!(read_code(&mut reader).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_token_needs_consent() {
        let dir = tempfile::tempdir().unwrap();
        let reused = reuse_existing_token(&dir.path().join("token.json"), &[])
            .await
            .unwrap();
        assert!(!reused);
    }

    #[tokio::test]
    async fn test_valid_token_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(
            &path,
            r#"{"token":"ya29.x","refresh_token":"1//r","client_id":"id","scopes":["s"],"expiry":"2999-01-01T00:00:00.000000Z"}"#,
        )
        .unwrap();

        assert!(reuse_existing_token(&path, &["s".to_string()]).await.unwrap());
        assert!(!reuse_existing_token(&path, &["other".to_string()]).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_needs_consent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(
            &path,
            r#"{"token":"old","client_id":"id","scopes":[],"expiry":"2000-01-01T00:00:00.000000Z"}"#,
        )
        .unwrap();

        assert!(!reuse_existing_token(&path, &[]).await.unwrap());
    }
}
