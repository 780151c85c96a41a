//! Two-tier matching of Designite rows against churn rows.
//!
//! The exact tier pairs rows whose commit and normalized path agree. The
//! fallback tier pairs rows whose commit and basename agree, for files that
//! moved between the two analyses, and only fills pairings the exact tier did
//! not already produce.

use std::collections::HashSet;
use std::fmt;

use crate::table::Table;

use super::index::{churn_keys, designite_keys, ChurnIndex, ChurnKeys, DesigniteKeys};
use super::keys::ResolvedKeys;

/// Which tier produced a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    Exact,
    Fallback,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "exact"),
            MatchTier::Fallback => write!(f, "fallback"),
        }
    }
}

/// One Designite row paired with one churn row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedPair {
    /// Position of the Designite record.
    pub designite: usize,
    /// Position of the churn record.
    pub churn: usize,
    pub commit_id: String,
    /// The churn side's normalized new path, or the Designite path when that is empty.
    pub file_path: String,
    pub tier: MatchTier,
}

/// Match counters for one join run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub exact_matches: usize,
    pub fallback_matches: usize,
    /// Designite rows that produced no pair in either tier.
    pub unmatched_designite_rows: usize,
}

/// Ordered pairs plus counters.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    /// All exact pairs, then all fallback pairs.
    pub pairs: Vec<JoinedPair>,
    pub stats: JoinStats,
}

/// `(commit, designite path, churn new path)`.
type Triple<'a> = (&'a str, &'a str, &'a str);

/// Runs the exact pass and the fallback pass.
#[derive(Debug, Default)]
pub struct JoinEngine;

impl JoinEngine {
    pub fn new() -> Self {
        Self
    }

    /// Join two loaded tables using already-resolved key columns.
    pub fn join(&self, designite: &Table, churn: &Table, keys: &ResolvedKeys) -> JoinOutcome {
        let designite = designite_keys(designite, keys);
        let churn = churn_keys(churn, keys);
        self.join_keys(&designite, &churn)
    }

    /// Join on pre-derived keys.
    pub fn join_keys(&self, designite: &[DesigniteKeys], churn: &[ChurnKeys]) -> JoinOutcome {
        let index = ChurnIndex::build(churn);
        let mut seen: HashSet<Triple<'_>> = HashSet::new();
        let mut matched = vec![false; designite.len()];
        let mut pairs = Vec::new();

        for (d, des) in designite.iter().enumerate() {
            if des.commit.is_empty() || des.path.is_empty() {
                continue;
            }
            for &c in index.by_path(&des.commit, &des.path) {
                let ch = &churn[c];
                pairs.push(pair(d, des, c, ch, MatchTier::Exact));
                seen.insert((des.commit.as_str(), des.path.as_str(), ch.new_path.as_str()));
                matched[d] = true;
            }
        }
        let exact_matches = pairs.len();

        for (d, des) in designite.iter().enumerate() {
            if des.commit.is_empty() || des.basename.is_empty() {
                continue;
            }
            for &c in index.by_basename(&des.commit, &des.basename) {
                let ch = &churn[c];
                let triple = (des.commit.as_str(), des.path.as_str(), ch.new_path.as_str());
                if seen.contains(&triple) {
                    continue;
                }
                pairs.push(pair(d, des, c, ch, MatchTier::Fallback));
                matched[d] = true;
            }
        }

        let stats = JoinStats {
            exact_matches,
            fallback_matches: pairs.len() - exact_matches,
            unmatched_designite_rows: matched.iter().filter(|m| !**m).count(),
        };
        log::info!(
            "joined {} designite rows with {} churn rows: {} exact, {} fallback, {} unmatched",
            designite.len(),
            churn.len(),
            stats.exact_matches,
            stats.fallback_matches,
            stats.unmatched_designite_rows
        );

        JoinOutcome { pairs, stats }
    }
}

fn pair(d: usize, des: &DesigniteKeys, c: usize, ch: &ChurnKeys, tier: MatchTier) -> JoinedPair {
    let file_path = if ch.new_path.is_empty() {
        des.path.clone()
    } else {
        ch.new_path.clone()
    };
    log::trace!(
        "{} match: commit {} designite {} -> churn {}",
        tier,
        des.commit,
        des.path,
        file_path
    );
    JoinedPair {
        designite: d,
        churn: c,
        commit_id: des.commit.clone(),
        file_path,
        tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn des(commit: &str, path: &str) -> DesigniteKeys {
        let path = crate::table::paths::normalize(Some(path));
        DesigniteKeys {
            commit: commit.into(),
            basename: crate::table::paths::basename(&path).into(),
            path,
        }
    }

    fn churn(commit: &str, new_path: &str) -> ChurnKeys {
        let new_path = crate::table::paths::normalize(Some(new_path));
        ChurnKeys {
            commit: commit.into(),
            basename: crate::table::paths::basename(&new_path).into(),
            new_path,
            old_path: String::new(),
        }
    }

    fn summary(outcome: &JoinOutcome) -> Vec<(usize, usize, &str, MatchTier)> {
        outcome
            .pairs
            .iter()
            .map(|p| (p.designite, p.churn, p.file_path.as_str(), p.tier))
            .collect()
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(MatchTier::Exact.to_string(), "exact");
        assert_eq!(MatchTier::Fallback.to_string(), "fallback");
    }

    #[test]
    fn test_exact_match() {
        let outcome = JoinEngine::new().join_keys(
            &[des("c1", "src/A.java")],
            &[churn("c1", "src/A.java")],
        );
        assert_eq!(summary(&outcome), vec![(0, 0, "src/A.java", MatchTier::Exact)]);
        assert_eq!(outcome.stats.exact_matches, 1);
        assert_eq!(outcome.stats.fallback_matches, 0);
    }

    #[test]
    fn test_exact_match_after_normalization() {
        let outcome = JoinEngine::new().join_keys(
            &[des("c1", "src\\main\\A.java")],
            &[churn("c1", "src//main/A.java")],
        );
        assert_eq!(summary(&outcome), vec![(0, 0, "src/main/A.java", MatchTier::Exact)]);
    }

    #[test]
    fn test_fallback_match_uses_churn_path() {
        let outcome = JoinEngine::new().join_keys(
            &[des("c1", "old/A.java")],
            &[churn("c1", "new/A.java")],
        );
        assert_eq!(summary(&outcome), vec![(0, 0, "new/A.java", MatchTier::Fallback)]);
        assert_eq!(outcome.pairs[0].commit_id, "c1");
    }

    #[test]
    fn test_commit_must_match() {
        let outcome = JoinEngine::new().join_keys(
            &[des("c1", "src/A.java")],
            &[churn("c2", "src/A.java")],
        );
        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.stats.unmatched_designite_rows, 1);
    }

    #[test]
    fn test_exact_pairing_not_repeated_as_fallback() {
        // Same basename in two directories: the exact pairing must not show up
        // again in the fallback tier, the other directory still does.
        let outcome = JoinEngine::new().join_keys(
            &[des("c1", "a/A.java")],
            &[churn("c1", "a/A.java"), churn("c1", "b/A.java")],
        );
        assert_eq!(
            summary(&outcome),
            vec![
                (0, 0, "a/A.java", MatchTier::Exact),
                (0, 1, "b/A.java", MatchTier::Fallback),
            ]
        );
    }

    #[test]
    fn test_exact_pass_precedes_fallback_pass() {
        let outcome = JoinEngine::new().join_keys(
            &[des("c1", "old/B.java"), des("c1", "src/A.java")],
            &[churn("c1", "new/B.java"), churn("c1", "src/A.java")],
        );
        assert_eq!(
            summary(&outcome),
            vec![
                (1, 1, "src/A.java", MatchTier::Exact),
                (0, 0, "new/B.java", MatchTier::Fallback),
            ]
        );
    }

    #[test]
    fn test_one_to_many_fan_out() {
        let outcome = JoinEngine::new().join_keys(
            &[des("c1", "src/A.java")],
            &[churn("c1", "src/A.java"), churn("c1", "src/A.java")],
        );
        assert_eq!(
            summary(&outcome),
            vec![
                (0, 0, "src/A.java", MatchTier::Exact),
                (0, 1, "src/A.java", MatchTier::Exact),
            ]
        );
    }

    #[test]
    fn test_empty_keys_never_match() {
        let outcome = JoinEngine::new().join_keys(
            &[des("c1", "src/A.java"), des("", "src/A.java"), des("c1", "")],
            &[churn("c1", ""), churn("", "src/A.java")],
        );
        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.stats.unmatched_designite_rows, 3);
    }

    #[test]
    fn test_join_is_deterministic() {
        let designite = [des("c1", "a/A.java"), des("c1", "x/B.java"), des("c2", "C.java")];
        let churn_rows = [
            churn("c1", "b/A.java"),
            churn("c1", "a/A.java"),
            churn("c1", "y/B.java"),
            churn("c2", "z/C.java"),
        ];
        let first = JoinEngine::new().join_keys(&designite, &churn_rows);
        let second = JoinEngine::new().join_keys(&designite, &churn_rows);
        assert_eq!(first.pairs, second.pairs);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_join_tables() {
        let designite = Table::from_rows(
            vec!["child_commit_id".into(), "file_path".into()],
            vec![vec!["c1", "src/A.java"]],
        );
        let churn_table = Table::from_rows(
            vec!["child_commit".into(), "new_path".into()],
            vec![vec!["c1", "src\\A.java"]],
        );
        let keys = ResolvedKeys {
            designite_commit: "child_commit_id".into(),
            designite_path: "file_path".into(),
            churn_commit: "child_commit".into(),
            churn_new_path: "new_path".into(),
            churn_old_path: None,
        };

        let outcome = JoinEngine::new().join(&designite, &churn_table, &keys);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].file_path, "src/A.java");
    }
}
