//! Text printed to stdout after `filter` and `transform`.

use std::path::Path;

use mailsift_core::Table;

/// Rows shown in a dry-run preview.
const PREVIEW_ROWS: usize = 5;

/// Counts and paths of one filtering run.
#[derive(Debug, Clone)]
pub struct Outcome<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub total: usize,
    pub kept: usize,
}

impl Outcome<'_> {
    /// Share of rows kept, in percent.
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.kept as f64 / self.total as f64 * 100.0
        }
    }

    /// Dry-run summary. `kept_label` names the kept rows.
    pub fn dry_run(&self, kept_label: &str) -> String {
        format!(
            "\nDry run results:\nTotal emails: {}\n{kept_label}: {}\nPercentage: {:.2}%\n",
            self.total,
            self.kept,
            self.percentage()
        )
    }

    /// Completion summary. `kept_description` follows the kept count.
    pub fn complete(&self, heading: &str, kept_description: &str) -> String {
        format!(
            "{heading}\nInput: {} ({} emails)\nOutput: {} ({} {kept_description})\nFilter rate: {:.2}%\n",
            self.input.display(),
            self.total,
            self.output.display(),
            self.kept,
            self.percentage()
        )
    }
}

/// First rows of the columns that exist, or a notice when none do.
pub fn preview(table: &Table, heading: &str, columns: &[&str]) -> String {
    let available: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| table.has_column(c))
        .collect();

    let mut out = String::from("\n");
    out.push_str(heading);
    out.push('\n');
    if available.is_empty() {
        out.push_str("No standard email columns found for preview\n");
    } else {
        out.push_str(&table.render(&available, PREVIEW_ROWS));
    }
    out
}
