//! Row filters for exported email tables.
//!
//! Both filters return a subset of the input rows in input order.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::Result;
use crate::input::require_columns;
use crate::labels::parse_label_list;
use crate::table::Table;
use mailsift_mime::parse_address;

/// Columns searched by [`extract_job_application_rows`] unless told otherwise.
pub const DEFAULT_COLUMNS: &[&str] = &["Subject", "Body"];

/// Keywords that mark a job application email.
pub const DEFAULT_KEYWORDS: &[&str] = &["application", "bewerbung"];

/// Keywords that disqualify a row even when it matches.
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &["github"];

/// Gmail label that groups application emails.
pub const DEFAULT_LABEL_NAME: &str = "JOB";

/// Column written by [`transform_dataframe`] with the sender's display name.
pub const NAME_COLUMN: &str = "Name";
/// Column written by [`transform_dataframe`] with the sender's address.
pub const EMAIL_COLUMN: &str = "Email";
/// Column written by [`transform_dataframe`] with the label suffix.
pub const STATUS_COLUMN: &str = "ApplicationStatus";

/// Builds one case-insensitive alternation of literal keywords.
///
/// Returns `None` for an empty keyword list, which matches nothing.
fn keyword_pattern<S: AsRef<str>>(keywords: &[S]) -> Result<Option<Regex>> {
    if keywords.is_empty() {
        return Ok(None);
    }
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = RegexBuilder::new(&alternation).case_insensitive(true).build()?;
    Ok(Some(pattern))
}

/// Keeps rows that mention any keyword and no exclude keyword.
///
/// A row matches if any of the searched columns contains any keyword, and
/// is excluded if any of them contains any exclude keyword. Columns missing
/// from the table are skipped.
///
/// # Errors
///
/// Returns an error if a keyword pattern cannot be compiled.
pub fn extract_job_application_rows<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    keywords: &[S],
    exclude_keywords: &[S],
) -> Result<Table> {
    let include = keyword_pattern(keywords)?;
    let exclude = keyword_pattern(exclude_keywords)?;

    let indices: Vec<usize> = columns
        .iter()
        .filter_map(|c| table.column_index(c.as_ref()))
        .collect();

    let mask: Vec<bool> = table
        .rows()
        .iter()
        .map(|row| {
            let cells = || indices.iter().map(|&i| row[i].as_str());
            let matched = include
                .as_ref()
                .is_some_and(|re| cells().any(|cell| re.is_match(cell)));
            let excluded = exclude
                .as_ref()
                .is_some_and(|re| cells().any(|cell| re.is_match(cell)));
            matched && !excluded
        })
        .collect();

    let mut filtered = table.clone();
    filtered.retain_rows(&mask);
    debug!(
        kept = filtered.len(),
        total = table.len(),
        "keyword filter applied"
    );
    Ok(filtered)
}

/// Keeps rows carrying `label_name` and adds sender and status columns.
///
/// A row is kept when one of its labels is exactly `label_name` or starts
/// with `label_name/`. `ApplicationStatus` is the part after the slash of
/// the first nested label (empty when only the bare label is present).
/// `Name` and `Email` come from the `From` header.
///
/// # Errors
///
/// Returns an error if the `Labels` or `From` column is missing.
pub fn transform_dataframe(table: &Table, label_name: &str) -> Result<Table> {
    require_columns(table, &["Labels", "From"])?;

    let status_pattern = Regex::new(&format!("^{}/(.+)$", regex::escape(label_name)))?;
    let prefix = format!("{label_name}/");

    let mut mask = Vec::with_capacity(table.len());
    let mut names = Vec::new();
    let mut emails = Vec::new();
    let mut statuses = Vec::new();

    for i in 0..table.len() {
        let labels = parse_label_list(table.get(i, "Labels").unwrap_or_default());
        let keep = labels
            .iter()
            .any(|l| l == label_name || l.starts_with(&prefix));
        mask.push(keep);
        if !keep {
            continue;
        }

        let status = labels
            .iter()
            .find_map(|l| status_pattern.captures(l))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let address = parse_address(table.get(i, "From").unwrap_or_default());

        names.push(address.name);
        emails.push(address.email);
        statuses.push(status);
    }

    let mut transformed = table.clone();
    transformed.retain_rows(&mask);
    transformed.push_column(NAME_COLUMN, names);
    transformed.push_column(EMAIL_COLUMN, emails);
    transformed.push_column(STATUS_COLUMN, statuses);
    debug!(
        kept = transformed.len(),
        total = table.len(),
        label = label_name,
        "label transform applied"
    );
    Ok(transformed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::table::Record;
    use proptest::prelude::*;

    fn emails() -> Table {
        let rows: [[&str; 4]; 5] = [
            ["['INBOX', 'JOB/Rejected']", "HR <hr@corp.example>", "Your Application", "We regret"],
            ["['INBOX']", "news@list.example", "Weekly digest", "nothing here"],
            ["['JOB']", "\"Doe, Jane\" <jane@corp.example>", "Interview", "Bewerbung received"],
            ["['INBOX', 'JOB/Offer']", "bot@github.com", "application via GitHub", "see github"],
            ["['JOBS']", "x@y.example", "Application", ""],
        ];
        Table::from_records(rows.iter().map(|r| -> Record {
            ["Labels", "From", "Subject", "Body"]
                .iter()
                .zip(r)
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        }))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn subjects(table: &Table) -> Vec<String> {
        (0..table.len())
            .map(|i| table.get(i, "Subject").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_default_keyword_filter() {
        let table = emails();
        let filtered = extract_job_application_rows(
            &table,
            DEFAULT_COLUMNS,
            DEFAULT_KEYWORDS,
            DEFAULT_EXCLUDE_KEYWORDS,
        )
        .unwrap();
        assert_eq!(subjects(&filtered), vec!["Your Application", "Interview", "Application"]);
        assert_eq!(filtered.columns(), table.columns());
    }

    #[test]
    fn test_keywords_are_literal_not_regex() {
        let mut table = Table::new(["Subject"]);
        table.push_row(strings(&["c++ developer"]));
        table.push_row(strings(&["cxx developer"]));
        let filtered = extract_job_application_rows(
            &table,
            &strings(&["Subject"]),
            &strings(&["C++"]),
            &[],
        )
        .unwrap();
        assert_eq!(subjects(&filtered), vec!["c++ developer"]);
    }

    #[test]
    fn test_empty_keywords_match_nothing() {
        let filtered =
            extract_job_application_rows(&emails(), DEFAULT_COLUMNS, &[], &[]).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_empty_exclusions_exclude_nothing() {
        let filtered =
            extract_job_application_rows(&emails(), DEFAULT_COLUMNS, DEFAULT_KEYWORDS, &[])
                .unwrap();
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_missing_columns_are_skipped() {
        let filtered = extract_job_application_rows(
            &emails(),
            &["Nope", "Body"],
            &["bewerbung"],
            &["github"],
        )
        .unwrap();
        assert_eq!(subjects(&filtered), vec!["Interview"]);
    }

    #[test]
    fn test_exclusion_checked_across_all_columns() {
        // Keyword in Subject, exclusion only in Body.
        let filtered =
            extract_job_application_rows(&emails(), &["Subject", "Body"], &["application"], &["see github"])
                .unwrap();
        assert!(!subjects(&filtered).contains(&"application via GitHub".to_string()));
    }

    #[test]
    fn test_transform_extracts_status_and_sender() {
        let transformed = transform_dataframe(&emails(), DEFAULT_LABEL_NAME).unwrap();

        assert_eq!(
            subjects(&transformed),
            vec!["Your Application", "Interview", "application via GitHub"]
        );
        assert_eq!(
            &transformed.columns()[4..],
            [NAME_COLUMN, EMAIL_COLUMN, STATUS_COLUMN]
        );

        assert_eq!(transformed.get(0, STATUS_COLUMN), Some("Rejected"));
        assert_eq!(transformed.get(0, NAME_COLUMN), Some("HR"));
        assert_eq!(transformed.get(0, EMAIL_COLUMN), Some("hr@corp.example"));

        assert_eq!(transformed.get(1, STATUS_COLUMN), Some(""));
        assert_eq!(transformed.get(1, NAME_COLUMN), Some("Doe, Jane"));

        assert_eq!(transformed.get(2, STATUS_COLUMN), Some("Offer"));
        assert_eq!(transformed.get(2, NAME_COLUMN), Some(""));
        assert_eq!(transformed.get(2, EMAIL_COLUMN), Some("bot@github.com"));
    }

    #[test]
    fn test_transform_accepts_plain_label_lists_and_nested_status() {
        let mut table = Table::new(["Labels", "From"]);
        table.push_row(strings(&["INBOX, JOB/Interview/Round 2", "a@b.example"]));
        let transformed = transform_dataframe(&table, "JOB").unwrap();
        assert_eq!(transformed.get(0, STATUS_COLUMN), Some("Interview/Round 2"));
    }

    #[test]
    fn test_transform_label_name_is_literal() {
        let mut table = Table::new(["Labels", "From"]);
        table.push_row(strings(&["['A.B/x']", "a@b.example"]));
        table.push_row(strings(&["['AxB/y']", "a@b.example"]));
        let transformed = transform_dataframe(&table, "A.B").unwrap();
        assert_eq!(transformed.len(), 1);
        assert_eq!(transformed.get(0, STATUS_COLUMN), Some("x"));
    }

    #[test]
    fn test_transform_replaces_existing_columns_in_place() {
        let mut table = Table::new(["Labels", "ApplicationStatus", "From"]);
        table.push_row(strings(&["['JOB/Applied']", "stale", "a@b.example"]));
        let transformed = transform_dataframe(&table, "JOB").unwrap();
        assert_eq!(transformed.column_index(STATUS_COLUMN), Some(1));
        assert_eq!(transformed.get(0, STATUS_COLUMN), Some("Applied"));
    }

    #[test]
    fn test_transform_requires_columns() {
        let table = Table::new(["Labels"]);
        assert!(transform_dataframe(&table, "JOB").is_err());
    }

    proptest! {
        #[test]
        fn filter_output_is_ordered_subset(
            cells in proptest::collection::vec("[a-z ]{0,12}", 0..20),
            keyword in "[a-z]{1,3}",
        ) {
            let mut table = Table::new(["Subject"]);
            for (i, cell) in cells.iter().enumerate() {
                table.push_row(vec![format!("{i}:{cell}")]);
            }
            let filtered = extract_job_application_rows(
                &table,
                &["Subject".to_string()],
                &[keyword],
                &[],
            ).unwrap();

            let mut last = None;
            for row in filtered.rows() {
                prop_assert!(table.rows().contains(row));
                let index: usize = row[0].split(':').next().unwrap().parse().unwrap();
                prop_assert!(last.is_none_or(|l| l < index));
                last = Some(index);
            }
        }
    }
}
