//! Derived join keys and the churn lookup indexes.
//!
//! Loaded records are never modified: normalized paths and basenames live in
//! side tables that run parallel to each [`Table`]'s records.

use std::collections::HashMap;

use crate::table::paths::{basename, normalize};
use crate::table::{Record, Table};

use super::keys::ResolvedKeys;

/// Join keys derived from one Designite record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesigniteKeys {
    pub commit: String,
    pub path: String,
    pub basename: String,
}

impl DesigniteKeys {
    pub fn derive(record: &Record, keys: &ResolvedKeys) -> Self {
        let path = normalize(field(record, &keys.designite_path));
        Self {
            commit: field(record, &keys.designite_commit).unwrap_or_default().to_string(),
            basename: basename(&path).to_string(),
            path,
        }
    }
}

/// Join keys derived from one churn record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChurnKeys {
    pub commit: String,
    pub new_path: String,
    pub old_path: String,
    pub basename: String,
}

impl ChurnKeys {
    pub fn derive(record: &Record, keys: &ResolvedKeys) -> Self {
        let new_path = normalize(field(record, &keys.churn_new_path));
        let old_path = normalize(
            keys.churn_old_path
                .as_deref()
                .and_then(|column| record.get(column).map(String::as_str)),
        );
        Self {
            commit: field(record, &keys.churn_commit).unwrap_or_default().to_string(),
            basename: basename(&new_path).to_string(),
            new_path,
            old_path,
        }
    }
}

fn field<'a>(record: &'a Record, column: &str) -> Option<&'a str> {
    record.get(column).map(String::as_str)
}

/// Derive keys for every Designite record, in row order.
pub fn designite_keys(table: &Table, keys: &ResolvedKeys) -> Vec<DesigniteKeys> {
    table.iter().map(|r| DesigniteKeys::derive(r, keys)).collect()
}

/// Derive keys for every churn record, in row order.
pub fn churn_keys(table: &Table, keys: &ResolvedKeys) -> Vec<ChurnKeys> {
    table.iter().map(|r| ChurnKeys::derive(r, keys)).collect()
}

/// A `(commit, path-or-basename)` lookup key.
type PairKey<'a> = (&'a str, &'a str);

/// Two independent multimaps over churn row positions.
///
/// Each bucket lists churn rows in input order. Rows with an empty commit or
/// path are indexed like any other; callers decide what they look up.
#[derive(Debug, Default)]
pub struct ChurnIndex<'a> {
    by_commit_and_path: HashMap<PairKey<'a>, Vec<usize>>,
    by_commit_and_basename: HashMap<PairKey<'a>, Vec<usize>>,
}

impl<'a> ChurnIndex<'a> {
    pub fn build(churn: &'a [ChurnKeys]) -> Self {
        let mut index = Self::default();
        for (position, keys) in churn.iter().enumerate() {
            index
                .by_commit_and_path
                .entry((keys.commit.as_str(), keys.new_path.as_str()))
                .or_default()
                .push(position);
            index
                .by_commit_and_basename
                .entry((keys.commit.as_str(), keys.basename.as_str()))
                .or_default()
                .push(position);
        }
        log::debug!(
            "indexed {} churn rows: {} path keys, {} basename keys",
            churn.len(),
            index.by_commit_and_path.len(),
            index.by_commit_and_basename.len()
        );
        index
    }

    /// Churn rows whose commit and normalized new path equal the given pair.
    pub fn by_path<'s>(&'s self, commit: &'s str, path: &'s str) -> &'s [usize] {
        self.by_commit_and_path
            .get(&(commit, path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Churn rows whose commit and new-path basename equal the given pair.
    pub fn by_basename<'s>(&'s self, commit: &'s str, basename: &'s str) -> &'s [usize] {
        self.by_commit_and_basename
            .get(&(commit, basename))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
