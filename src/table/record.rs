//! In-memory records and tables.

use indexmap::{IndexMap, IndexSet};

/// One source row: column name to value, in header order.
pub type Record = IndexMap<String, String>;

/// A loaded CSV: the declared header and every data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header row as read from the source.
    pub header: Vec<String>,
    /// Data rows in source order.
    pub records: Vec<Record>,
}

impl Table {
    /// Create a table from a header and its records.
    pub fn new(header: Vec<String>, records: Vec<Record>) -> Self {
        Self { header, records }
    }

    /// Build a table from positional rows, aligning each row to the header.
    ///
    /// Short rows are padded with empty strings; fields beyond the header are
    /// dropped.
    pub fn from_rows<I, R, S>(header: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = rows
            .into_iter()
            .map(|row| align(&header, row))
            .collect();
        Self { header, records }
    }

    /// Ordered union of every column name used by any record, first-seen order.
    ///
    /// Records built outside the loader may carry columns the header never
    /// declared; those are folded in where they first appear.
    pub fn column_union(&self) -> Vec<String> {
        let mut columns: IndexSet<&str> = IndexSet::new();
        for record in &self.records {
            columns.extend(record.keys().map(String::as_str));
        }
        columns.into_iter().map(str::to_string).collect()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}

fn align<R, S>(header: &[String], row: R) -> Record
where
    R: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut values = row.into_iter();
    header
        .iter()
        .map(|name| {
            let value = values.next().map(Into::into).unwrap_or_default();
            (name.clone(), value)
        })
        .collect()
}
