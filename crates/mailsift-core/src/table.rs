//! In-memory email table with CSV persistence.
//!
//! Every command works on the same shape: named string columns, one row per
//! message. Missing values are empty strings.

use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;

/// A row under construction: `(column, value)` pairs in insertion order.
pub type Record = Vec<(String, String)>;

/// Widest cell shown by [`Table::render`].
const RENDER_CELL_WIDTH: usize = 40;

/// Rows of string cells under a fixed list of column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from records.
    ///
    /// Columns are the union of all record keys in first-seen order; a
    /// record without a key gets an empty cell there.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let records: Vec<Record> = records.into_iter().collect();
        let mut table = Self::default();

        for record in &records {
            for (key, _) in record {
                if !table.has_column(key) {
                    table.columns.push(key.clone());
                }
            }
        }

        for record in records {
            let mut row = vec![String::new(); table.columns.len()];
            for (key, value) in record {
                if let Some(i) = table.column_index(&key) {
                    row[i] = value;
                }
            }
            table.rows.push(row);
        }

        table
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column (exact, case-sensitive name match).
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns true if the column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in `column`.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Keeps the rows whose mask entry is true; order is preserved.
    ///
    /// Rows past the end of the mask are dropped.
    pub fn retain_rows(&mut self, mask: &[bool]) {
        let mut keep = mask.iter().copied();
        self.rows.retain(|_| keep.next().unwrap_or(false));
    }

    /// Returns a new table with only the named columns that exist, in the
    /// order given.
    #[must_use]
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Self {
        let picked: Vec<(usize, &str)> = columns
            .iter()
            .filter_map(|c| self.column_index(c.as_ref()).map(|i| (i, c.as_ref())))
            .collect();

        Self {
            columns: picked.iter().map(|(_, name)| (*name).to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picked.iter().map(|(i, _)| row[*i].clone()).collect())
                .collect(),
        }
    }

    /// Returns the first `n` rows.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Sets a column from per-row values.
    ///
    /// An existing column is overwritten in place; otherwise it is appended.
    /// Missing values are filled with empty strings.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) {
        let mut values = values.into_iter();
        match self.column_index(name) {
            Some(i) => {
                for row in &mut self.rows {
                    row[i] = values.next().unwrap_or_default();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(values.next().unwrap_or_default());
                }
            }
        }
    }

    /// Appends another table's rows, widening the columns to their union.
    pub fn append(&mut self, other: Self) {
        for column in &other.columns {
            if !self.has_column(column) {
                self.columns.push(column.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }

        let mapping: Vec<usize> = other
            .columns
            .iter()
            .filter_map(|c| self.column_index(c))
            .collect();

        for row in other.rows {
            let mut new_row = vec![String::new(); self.columns.len()];
            for (value, &target) in row.into_iter().zip(&mapping) {
                new_row[target] = value;
            }
            self.rows.push(new_row);
        }
    }

    /// Reads a CSV with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid CSV.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), rows = table.len(), "read CSV");
        Ok(table)
    }

    /// Reads CSV from any reader.
    ///
    /// Short rows are padded with empty cells; extra cells are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid CSV.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut table = Self::new(reader.headers()?.iter());

        for (line, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > table.columns.len() {
                warn!(
                    row = line + 1,
                    fields = record.len(),
                    "row has more fields than the header; extra fields dropped"
                );
            }
            table.push_row(record.iter().map(str::to_string).collect());
        }

        Ok(table)
    }

    /// Writes the table as CSV with a header row and no index column,
    /// creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.to_writer(file)?;
        debug!(path = %path.display(), rows = self.len(), "wrote CSV");
        Ok(())
    }

    /// Writes CSV to any writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Formats the first `n` rows of the named columns as an aligned
    /// plain-text table (no index).
    ///
    /// Cells are flattened to one line and shortened to keep the preview
    /// readable. Unknown columns are skipped.
    #[must_use]
    pub fn render<S: AsRef<str>>(&self, columns: &[S], n: usize) -> String {
        let view = self.select(columns).head(n);
        let cells: Vec<Vec<String>> = view
            .rows
            .iter()
            .map(|row| row.iter().map(|c| preview_cell(c)).collect())
            .collect();

        let widths: Vec<usize> = view
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let lines = std::iter::once(&view.columns).chain(cells.iter());
        for line in lines {
            let formatted: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            out.push_str(formatted.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

fn preview_cell(value: &str) -> String {
    let flat: String = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= RENDER_CELL_WIDTH {
        return flat;
    }
    let mut short: String = flat.chars().take(RENDER_CELL_WIDTH - 3).collect();
    short.push_str("...");
    short
}
