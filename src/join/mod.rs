//! Join engine for churnmap.
//!
//! Resolves key columns, indexes the churn dataset, pairs Designite rows with
//! churn rows in two tiers and reconciles both column sets into one output
//! table.
//!
//! ```text
//!   Designite Table          Churn Table
//!        │                        │
//!        ▼                        ▼
//!   DesigniteKeys            ChurnKeys ──► ChurnIndex
//!        │                                  (path, basename)
//!        └──────────────┬───────────────────┘
//!                       ▼
//!                  JoinEngine  (exact pass, then fallback pass)
//!                       │
//!                       ▼
//!         OutputSchema + OutputTable  (dedup by commit_id, file_path)
//! ```

mod engine;
mod error;
mod index;
mod keys;
mod reconcile;

pub use engine::{JoinEngine, JoinOutcome, JoinStats, JoinedPair, MatchTier};
pub use error::{JoinError, JoinResult};
pub use index::{churn_keys, designite_keys, ChurnIndex, ChurnKeys, DesigniteKeys};
pub use keys::{resolve_column, KeyColumns, ResolvedKeys};
pub use reconcile::{OutputSchema, OutputTable, ReconcileOptions, KEY_COLUMNS};
