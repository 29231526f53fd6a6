//! `mailsift transform`

use anyhow::Result;
use mailsift_core::filters::DEFAULT_LABEL_NAME;
use mailsift_core::{
    Settings, load_email_data, require_columns, transform_dataframe, validate_input_file,
};
use tracing::info;

use crate::cli::TransformArgs;
use crate::report::{self, Outcome};

const REQUIRED_COLUMNS: &[&str] = &["Labels", "From"];
const PREVIEW_COLUMNS: &[&str] = &["Subject", "Name", "Email", "Date", "ApplicationStatus"];

pub fn run(args: &TransformArgs, settings: &Settings) -> Result<()> {
    validate_input_file(&args.input)?;
    let table = load_email_data(&args.input)?;
    require_columns(&table, REQUIRED_COLUMNS)?;

    let label_name = args
        .label_name
        .as_deref()
        .or(settings.label_name.as_deref())
        .unwrap_or(DEFAULT_LABEL_NAME);
    info!("Label name to filter: {label_name}");
    info!("Required columns found: {REQUIRED_COLUMNS:?}");

    let transformed = transform_dataframe(&table, label_name)?;
    info!(
        "Transformed {} emails out of {} total emails",
        transformed.len(),
        table.len()
    );

    let outcome = Outcome {
        input: &args.input,
        output: &args.output,
        total: table.len(),
        kept: transformed.len(),
    };

    if args.dry_run {
        print!("{}", outcome.dry_run(&format!("Emails with label '{label_name}'")));
        if args.verbose && !transformed.is_empty() {
            print!(
                "{}",
                report::preview(
                    &transformed,
                    "Sample results (first 5 with ApplicationStatus column):",
                    PREVIEW_COLUMNS
                )
            );
        }
        return Ok(());
    }

    transformed.write_csv(&args.output)?;
    info!(
        "Successfully saved {} transformed emails to {}",
        transformed.len(),
        args.output.display()
    );
    print!(
        "{}",
        outcome.complete(
            "Transformation complete!",
            "emails with ApplicationStatus, Name, and Email columns"
        )
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailsift_core::Table;
    use std::path::{Path, PathBuf};

    fn args(input: PathBuf, output: PathBuf) -> TransformArgs {
        TransformArgs {
            input,
            output,
            label_name: None,
            verbose: false,
            dry_run: false,
        }
    }

    fn write_input(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("data.csv");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_run_adds_columns() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "Labels,From,Subject\n\
             \"['INBOX', 'JOB/Interview']\",Jane <jane@corp.example>,Invite\n\
             \"['INBOX']\",x@y.example,Other\n",
        );
        let output = dir.path().join("out.csv");

        run(&args(input, output.clone()), &Settings::default()).unwrap();

        let written = Table::read_csv(&output).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(
            written.columns(),
            ["Labels", "From", "Subject", "Name", "Email", "ApplicationStatus"]
        );
        assert_eq!(written.get(0, "ApplicationStatus"), Some("Interview"));
        assert_eq!(written.get(0, "Name"), Some("Jane"));
    }

    #[test]
    fn test_label_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "Labels,From\n\"['APPLY/Sent']\",a@b.example\n\"['JOB/Sent']\",c@d.example\n",
        );
        let output = dir.path().join("out.csv");
        let settings = Settings {
            label_name: Some("APPLY".to_string()),
            ..Settings::default()
        };

        run(&args(input, output.clone()), &settings).unwrap();
        let written = Table::read_csv(&output).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written.get(0, "Email"), Some("a@b.example"));
    }

    #[test]
    fn test_missing_required_columns() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "Subject\nHello\n");
        let err = run(&args(input, dir.path().join("out.csv")), &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("Required columns [\"Labels\", \"From\"] not found"));
    }
}
