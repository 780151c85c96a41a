//! Output header computation and row materialization.
//!
//! The merged header is `commit_id, file_path`, then the kept Designite
//! columns, then the kept churn columns. A churn column whose name is already
//! taken gets the clash suffix appended.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::table::Table;

use super::engine::JoinedPair;
use super::error::{JoinError, JoinResult};
use super::keys::ResolvedKeys;

/// Leading key columns of every output row.
pub const KEY_COLUMNS: [&str; 2] = ["commit_id", "file_path"];

/// Controls which source columns survive and how clashes are renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Appended to churn column names that clash with an output column.
    pub clash_suffix: String,
    /// Designite columns dropped in addition to the resolved key columns.
    pub designite_drop: Vec<String>,
    /// Churn columns dropped in addition to the resolved key columns.
    pub churn_drop: Vec<String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            clash_suffix: "_churn".to_string(),
            designite_drop: vec!["left_commit_id".to_string(), "child_commit".to_string()],
            churn_drop: vec!["parent_commit".to_string(), "index".to_string()],
        }
    }
}

impl ReconcileOptions {
    /// Set the clash suffix.
    pub fn clash_suffix(mut self, value: impl Into<String>) -> Self {
        self.clash_suffix = value.into();
        self
    }
}

/// The merged header and where each column's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    header: Vec<String>,
    designite_columns: Vec<String>,
    /// `(source name, emitted name)`
    churn_columns: Vec<(String, String)>,
}

impl OutputSchema {
    pub fn build(
        designite: &Table,
        churn: &Table,
        keys: &ResolvedKeys,
        options: &ReconcileOptions,
    ) -> JoinResult<Self> {
        if options.clash_suffix.is_empty() {
            return Err(JoinError::EmptyClashSuffix);
        }

        let mut designite_drop: HashSet<&str> = KEY_COLUMNS.into_iter().collect();
        designite_drop.insert(&keys.designite_commit);
        designite_drop.insert(&keys.designite_path);
        designite_drop.extend(options.designite_drop.iter().map(String::as_str));

        let mut churn_drop: HashSet<&str> = HashSet::new();
        churn_drop.insert(&keys.churn_commit);
        churn_drop.insert(&keys.churn_new_path);
        churn_drop.extend(keys.churn_old_path.as_deref());
        churn_drop.extend(options.churn_drop.iter().map(String::as_str));

        let designite_columns: Vec<String> = designite
            .column_union()
            .into_iter()
            .filter(|c| !designite_drop.contains(c.as_str()))
            .collect();
        let churn_raw: Vec<String> = churn
            .column_union()
            .into_iter()
            .filter(|c| !churn_drop.contains(c.as_str()))
            .collect();

        let mut taken: HashSet<String> = KEY_COLUMNS.iter().map(|s| s.to_string()).collect();
        taken.extend(designite_columns.iter().cloned());
        let clashes: HashSet<&str> = churn_raw
            .iter()
            .map(String::as_str)
            .filter(|c| taken.contains(*c))
            .collect();
        // Non-clashing churn names are kept verbatim, so reserve them before
        // picking suffixed names for the clashing ones.
        taken.extend(
            churn_raw
                .iter()
                .filter(|c| !clashes.contains(c.as_str()))
                .cloned(),
        );

        let churn_columns: Vec<(String, String)> = churn_raw
            .iter()
            .map(|source| {
                if !clashes.contains(source.as_str()) {
                    return (source.clone(), source.clone());
                }
                let mut emitted = format!("{source}{}", options.clash_suffix);
                while taken.contains(&emitted) {
                    emitted.push_str(&options.clash_suffix);
                }
                taken.insert(emitted.clone());
                (source.clone(), emitted)
            })
            .collect();

        if !clashes.is_empty() {
            log::debug!("renamed clashing churn columns: {:?}", clashes);
        }

        let header = KEY_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(designite_columns.iter().cloned())
            .chain(churn_columns.iter().map(|(_, emitted)| emitted.clone()))
            .collect();

        Ok(Self {
            header,
            designite_columns,
            churn_columns,
        })
    }

    /// Column names in output order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Emitted name for a churn source column, if it is kept.
    pub fn churn_column_name(&self, source: &str) -> Option<&str> {
        self.churn_columns
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, emitted)| emitted.as_str())
    }

    fn render(&self, pair: &JoinedPair, designite: &Table, churn: &Table) -> Vec<String> {
        let des = designite.records.get(pair.designite);
        let ch = churn.records.get(pair.churn);

        let mut row = Vec::with_capacity(self.width());
        row.push(pair.commit_id.clone());
        row.push(pair.file_path.clone());
        for column in &self.designite_columns {
            row.push(des.and_then(|r| r.get(column)).cloned().unwrap_or_default());
        }
        for (source, _) in &self.churn_columns {
            row.push(ch.and_then(|r| r.get(source)).cloned().unwrap_or_default());
        }
        row
    }
}

/// Output rows keyed by `(commit_id, file_path)`.
///
/// A later row with the same key replaces the stored values but keeps the
/// position of the first one.
#[derive(Debug, Clone, Default)]
pub struct OutputTable {
    header: Vec<String>,
    rows: IndexMap<(String, String), Vec<String>>,
}

impl OutputTable {
    /// Render every pair, in order, through the schema.
    pub fn materialize(
        schema: &OutputSchema,
        pairs: &[JoinedPair],
        designite: &Table,
        churn: &Table,
    ) -> Self {
        let mut table = Self {
            header: schema.header.clone(),
            rows: IndexMap::with_capacity(pairs.len()),
        };
        for pair in pairs {
            table.insert(
                (pair.commit_id.clone(), pair.file_path.clone()),
                schema.render(pair, designite, churn),
            );
        }
        log::debug!(
            "materialized {} pairs into {} unique rows",
            pairs.len(),
            table.len()
        );
        table
    }

    fn insert(&mut self, key: (String, String), row: Vec<String>) {
        // IndexMap::insert keeps the existing slot when the key is present.
        self.rows.insert(key, row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up the stored row for a key.
    pub fn get(&self, commit_id: &str, file_path: &str) -> Option<&[String]> {
        self.rows
            .get(&(commit_id.to_string(), file_path.to_string()))
            .map(Vec::as_slice)
    }

    /// Rows in first-insertion order.
    pub fn rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.rows.values()
    }

    /// Consume into header and rows.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.header, self.rows.into_values().collect())
    }
}
