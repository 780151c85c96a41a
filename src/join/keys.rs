//! Key column resolution.
//!
//! Both datasets have been produced with slightly different header spellings
//! over time, so each logical key field accepts a list of candidates.

use crate::table::Table;

use super::error::{JoinError, JoinResult};

/// Find the first candidate column present in the table.
///
/// The first record decides when it carries any candidate. Otherwise every
/// record is scanned in order, for tables whose rows do not share one column
/// set. An empty table resolves nothing.
pub fn resolve_column<S: AsRef<str>>(table: &Table, candidates: &[S]) -> Option<String> {
    let first = table.records.first()?;

    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|c| first.contains_key(*c))
        .or_else(|| {
            table.iter().find_map(|record| {
                candidates
                    .iter()
                    .map(AsRef::as_ref)
                    .find(|c| record.contains_key(*c))
            })
        })
        .map(str::to_string)
}

/// Accepted header spellings per logical key field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumns {
    pub designite_commit: Vec<String>,
    pub designite_path: Vec<String>,
    pub churn_commit: Vec<String>,
    pub churn_new_path: Vec<String>,
    /// Optional; a churn table without it still joins.
    pub churn_old_path: Vec<String>,
}

impl Default for KeyColumns {
    fn default() -> Self {
        Self {
            designite_commit: names(&["child_commit_id", "commit_id"]),
            designite_path: names(&["file_path"]),
            churn_commit: names(&["child_commit", "commit_id"]),
            churn_new_path: names(&["new_path"]),
            churn_old_path: names(&["old_path"]),
        }
    }
}

impl KeyColumns {
    /// Resolve every key field against the two datasets.
    ///
    /// Fails with [`JoinError::MissingHeaders`] naming each required field
    /// that has no matching column.
    pub fn resolve(&self, designite: &Table, churn: &Table) -> JoinResult<ResolvedKeys> {
        let designite_commit = resolve_column(designite, self.designite_commit.as_slice());
        let designite_path = resolve_column(designite, self.designite_path.as_slice());
        let churn_commit = resolve_column(churn, self.churn_commit.as_slice());
        let churn_new_path = resolve_column(churn, self.churn_new_path.as_slice());
        let churn_old_path = resolve_column(churn, self.churn_old_path.as_slice());

        match (designite_commit, designite_path, churn_commit, churn_new_path) {
            (Some(designite_commit), Some(designite_path), Some(churn_commit), Some(churn_new_path)) => {
                let keys = ResolvedKeys {
                    designite_commit,
                    designite_path,
                    churn_commit,
                    churn_new_path,
                    churn_old_path,
                };
                log::debug!("resolved key columns: {:?}", keys);
                Ok(keys)
            }
            (d_commit, d_path, c_commit, c_new) => {
                let missing = [
                    ("designite commit", d_commit.is_none()),
                    ("designite path", d_path.is_none()),
                    ("churn commit", c_commit.is_none()),
                    ("churn new path", c_new.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(field, _)| field.to_string())
                .collect();

                Err(JoinError::MissingHeaders {
                    missing,
                    required: self.describe_required(),
                })
            }
        }
    }

    fn describe_required(&self) -> String {
        format!(
            "in Designite: {}, {}; in Churn: {}, {}",
            self.designite_commit.join("|"),
            self.designite_path.join("|"),
            self.churn_commit.join("|"),
            self.churn_new_path.join("|"),
        )
    }
}

/// Column names actually used for the join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKeys {
    pub designite_commit: String,
    pub designite_path: String,
    pub churn_commit: String,
    pub churn_new_path: String,
    pub churn_old_path: Option<String>,
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
