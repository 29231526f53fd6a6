//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mailsift_core::mbox;
use mailsift_oauth::{GMAIL_READONLY_SCOPE, OOB_REDIRECT_URI};

/// Token file written by `auth` and read by `fetch`.
pub const DEFAULT_TOKEN_PATH: &str = "config/token.json";
/// OAuth client secrets downloaded from the Google Cloud console.
pub const DEFAULT_CREDENTIALS_PATH: &str = "config/credentials.json";

/// Export Gmail to CSV and sift out job application emails.
#[derive(Parser, Debug)]
#[command(name = "mailsift", version, about)]
pub struct Cli {
    /// Settings file (default: <config dir>/mailsift/settings.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch emails from the Gmail API into a CSV file
    Fetch(FetchArgs),
    /// Keep emails that mention job application keywords
    Filter(FilterArgs),
    /// Keep emails with a label and extract sender and application status
    Transform(TransformArgs),
    /// Convert mbox archives (e.g. Google Takeout) into a CSV file
    Import(ImportArgs),
    /// Authorize read-only Gmail access and save the token
    Auth(AuthArgs),
}

impl Command {
    /// Whether the subcommand asked for debug output.
    pub const fn verbose(&self) -> bool {
        match self {
            Self::Fetch(a) => a.verbose,
            Self::Filter(a) => a.verbose,
            Self::Transform(a) => a.verbose,
            Self::Import(a) => a.verbose,
            Self::Auth(a) => a.verbose,
        }
    }
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Gmail search query (default: after:2025/03/01 before:2025/03/30)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output CSV file
    #[arg(short, long, default_value = "data.csv")]
    pub output: PathBuf,

    /// Authorized-user token file (default: config/token.json)
    #[arg(short, long)]
    pub token: Option<PathBuf>,

    /// Only emails after this date (YYYY/MM/DD)
    #[arg(long)]
    pub after: Option<String>,

    /// Only emails before this date (YYYY/MM/DD)
    #[arg(long)]
    pub before: Option<String>,

    /// Only emails from the last N days (overrides other date options)
    #[arg(long, value_name = "N")]
    pub last_days: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Input CSV file containing email data
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file for the filtered rows
    #[arg(short, long, default_value = "filtered_applications.csv")]
    pub output: PathBuf,

    /// Columns to search (default: Subject Body)
    #[arg(short, long, num_args = 1..)]
    pub columns: Option<Vec<String>>,

    /// Keywords to search for, case-insensitive (default: application bewerbung)
    #[arg(short, long, num_args = 1..)]
    pub keywords: Option<Vec<String>>,

    /// Keywords that exclude a row (default: github)
    #[arg(short, long, num_args = 1..)]
    pub exclude_keywords: Option<Vec<String>>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would be filtered without writing the output file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Input CSV file containing email data
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file for the transformed rows
    #[arg(short, long, default_value = "transformed_labels.csv")]
    pub output: PathBuf,

    /// Label to filter by (default: JOB)
    #[arg(short, long)]
    pub label_name: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would be transformed without writing the output file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// mbox files to read
    #[arg(long, alias = "mbox_paths", num_args = 1.., required = true)]
    pub mbox_paths: Vec<PathBuf>,

    /// Output CSV file
    #[arg(long, alias = "output_path", default_value = mbox::DEFAULT_OUTPUT_PATH)]
    pub output_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct AuthArgs {
    /// Where to write the token (default: config/token.json)
    #[arg(long, alias = "token_path")]
    pub token_path: Option<PathBuf>,

    /// OAuth client secrets file (default: config/credentials.json)
    #[arg(long, alias = "credentials_path")]
    pub credentials_path: Option<PathBuf>,

    /// Scopes to request
    #[arg(long, num_args = 1.., default_value = GMAIL_READONLY_SCOPE)]
    pub scopes: Vec<String>,

    /// Redirect URI registered for the client
    #[arg(long, default_value = OOB_REDIRECT_URI)]
    pub redirect_uri: String,

    /// Print the consent URL without opening a browser
    #[arg(long)]
    pub no_browser: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
