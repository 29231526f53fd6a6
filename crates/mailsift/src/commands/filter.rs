//! `mailsift filter`

use anyhow::{Result, bail};
use mailsift_core::filters::{DEFAULT_COLUMNS, DEFAULT_EXCLUDE_KEYWORDS, DEFAULT_KEYWORDS};
use mailsift_core::{Settings, extract_job_application_rows, load_email_data, validate_input_file};
use tracing::{info, warn};

use crate::cli::FilterArgs;
use crate::report::{self, Outcome};

const PREVIEW_COLUMNS: &[&str] = &["Subject", "From", "Date"];

/// Flag, then settings file, then built-in default.
fn resolve(flag: Option<&Vec<String>>, setting: Option<&Vec<String>>, default: &[&str]) -> Vec<String> {
    flag.or(setting)
        .cloned()
        .unwrap_or_else(|| default.iter().map(|s| (*s).to_string()).collect())
}

pub fn run(args: &FilterArgs, settings: &Settings) -> Result<()> {
    validate_input_file(&args.input)?;
    let table = load_email_data(&args.input)?;

    let requested = resolve(args.columns.as_ref(), settings.filter_columns.as_ref(), DEFAULT_COLUMNS);
    let keywords = resolve(args.keywords.as_ref(), settings.filter_keywords.as_ref(), DEFAULT_KEYWORDS);
    let exclude = resolve(
        args.exclude_keywords.as_ref(),
        settings.exclude_keywords.as_ref(),
        DEFAULT_EXCLUDE_KEYWORDS,
    );

    let (columns, missing): (Vec<String>, Vec<String>) =
        requested.into_iter().partition(|c| table.has_column(c));
    if !missing.is_empty() {
        warn!("Missing columns in dataset: {missing:?}");
        if columns.is_empty() {
            bail!(
                "None of the specified columns exist in the dataset. Available columns: {:?}",
                table.columns()
            );
        }
        info!("Using available columns: {columns:?}");
    }

    info!("Filtering with keywords: {keywords:?}");
    info!("Excluding keywords: {exclude:?}");
    info!("Searching in columns: {columns:?}");

    let filtered = extract_job_application_rows(&table, &columns, &keywords, &exclude)?;
    info!(
        "Found {} job application emails out of {} total emails",
        filtered.len(),
        table.len()
    );

    let outcome = Outcome {
        input: &args.input,
        output: &args.output,
        total: table.len(),
        kept: filtered.len(),
    };

    if args.dry_run {
        print!("{}", outcome.dry_run("Job application emails found"));
        if args.verbose && !filtered.is_empty() {
            print!(
                "{}",
                report::preview(&filtered, "Sample results (first 5):", PREVIEW_COLUMNS)
            );
        }
        return Ok(());
    }

    filtered.write_csv(&args.output)?;
    info!(
        "Successfully saved {} filtered emails to {}",
        filtered.len(),
        args.output.display()
    );
    print!("{}", outcome.complete("Filtering complete!", "job application emails"));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailsift_core::Table;
    use std::path::PathBuf;

    fn args(input: PathBuf, output: PathBuf) -> FilterArgs {
        FilterArgs {
            input,
            output,
            columns: None,
            keywords: None,
            exclude_keywords: None,
            verbose: false,
            dry_run: false,
        }
    }

    fn write_input(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("data.csv");
        std::fs::write(
            &path,
            "Subject,Body,From\n\
             Your application,thanks,a@x.example\n\
             Digest,nothing,b@x.example\n\
             Application on GitHub,github,c@x.example\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_resolve_precedence() {
        let flag = vec!["flag".to_string()];
        let setting = vec!["setting".to_string()];
        assert_eq!(resolve(Some(&flag), Some(&setting), &["default"]), flag);
        assert_eq!(resolve(None, Some(&setting), &["default"]), setting);
        assert_eq!(resolve(None, None, &["default"]), vec!["default"]);
    }

    #[test]
    fn test_run_writes_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("filtered.csv");

        run(&args(input, output.clone()), &Settings::default()).unwrap();

        let written = Table::read_csv(&output).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written.get(0, "Subject"), Some("Your application"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("filtered.csv");

        let mut dry = args(input, output.clone());
        dry.dry_run = true;
        run(&dry, &Settings::default()).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_settings_keywords_apply() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("filtered.csv");
        let settings = Settings {
            filter_keywords: Some(vec!["digest".to_string()]),
            ..Settings::default()
        };

        run(&args(input, output.clone()), &settings).unwrap();
        let written = Table::read_csv(&output).unwrap();
        assert_eq!(written.get(0, "Subject"), Some("Digest"));
    }

    #[test]
    fn test_no_usable_columns() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let mut bad = args(input, dir.path().join("out.csv"));
        bad.columns = Some(vec!["Nope".to_string()]);

        let err = run(&bad, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("None of the specified columns exist"));
    }

    #[test]
    fn test_rejects_non_csv_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            &args(dir.path().join("data.json"), dir.path().join("out.csv")),
            &Settings::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Input file must be a CSV file"));
    }
}
