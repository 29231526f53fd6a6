//! Loading the email CSV that `filter` and `transform` operate on.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::table::Table;

/// Checks that `path` names an existing `.csv` file.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the extension is not `.csv`
/// (any case), and [`Error::FileNotFound`] when the file is missing.
pub fn validate_input_file(path: &Path) -> Result<()> {
    let is_csv = path
        .to_string_lossy()
        .to_lowercase()
        .ends_with(".csv");
    if !is_csv {
        return Err(Error::InvalidInput(format!(
            "Input file must be a CSV file: {}",
            path.display()
        )));
    }

    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    Ok(())
}

/// Reads the email table, rejecting files without columns or rows.
///
/// # Errors
///
/// Returns [`Error::EmptyCsv`] for empty and header-only files, or the
/// underlying CSV/I/O error.
pub fn load_email_data(path: &Path) -> Result<Table> {
    let table = Table::read_csv(path)?;
    if table.is_empty() || table.columns().is_empty() {
        return Err(Error::EmptyCsv);
    }
    info!("Loaded {} emails from {}", table.len(), path.display());
    debug!("Columns in dataset: {:?}", table.columns());
    Ok(table)
}

/// Fails with [`Error::MissingColumns`] unless every column is present.
///
/// # Errors
///
/// Lists the missing and the available columns.
pub fn require_columns(table: &Table, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| (*c).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingColumns {
            missing,
            available: table.columns().to_vec(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_csv_extension() {
        let err = validate_input_file(Path::new("emails.txt")).unwrap_err();
        assert!(err.to_string().contains("Input file must be a CSV file"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EMAILS.CSV");
        std::fs::write(&path, "A\n1\n").unwrap();
        validate_input_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = validate_input_file(Path::new("/nonexistent/emails.csv")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert!(err.to_string().starts_with("Input file not found"));
    }

    #[test]
    fn test_empty_and_header_only_files_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "").unwrap();
        assert!(matches!(load_email_data(&empty), Err(Error::EmptyCsv)));

        let header_only = dir.path().join("header.csv");
        std::fs::write(&header_only, "Subject,Body\n").unwrap();
        let err = load_email_data(&header_only).unwrap_err();
        assert_eq!(err.to_string(), "CSV file is empty or has no columns");
    }

    #[test]
    fn test_require_columns() {
        let table = Table::new(["Labels", "Subject"]);
        require_columns(&table, &["Labels"]).unwrap();

        let err = require_columns(&table, &["Labels", "From"]).unwrap_err();
        match err {
            Error::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["From"]);
                assert_eq!(available, vec!["Labels", "Subject"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
