//! Mapper API - high-level interface for churnmap.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::MapperResult;
use crate::join::{JoinEngine, JoinStats, KeyColumns, OutputSchema, OutputTable, ReconcileOptions};
use crate::table::{ReadOptions, Table, TableReader, TableWriter, WriteOptions};

/// Mapping configuration options.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Path to the Designite CSV.
    pub designite_csv: PathBuf,
    /// Path to the churn CSV.
    pub churn_csv: PathBuf,
    /// Path of the merged CSV to write.
    pub output_csv: PathBuf,
    /// Accepted key column spellings.
    pub columns: KeyColumns,
    /// Column dropping and clash renaming.
    pub reconcile: ReconcileOptions,
    pub read: ReadOptions,
    pub write: WriteOptions,
}

impl MapperConfig {
    /// Create a new configuration with default column handling.
    pub fn new(
        designite_csv: impl Into<PathBuf>,
        churn_csv: impl Into<PathBuf>,
        output_csv: impl Into<PathBuf>,
    ) -> Self {
        Self {
            designite_csv: designite_csv.into(),
            churn_csv: churn_csv.into(),
            output_csv: output_csv.into(),
            columns: KeyColumns::default(),
            reconcile: ReconcileOptions::default(),
            read: ReadOptions::default(),
            write: WriteOptions::default(),
        }
    }

    /// Set the clash suffix for churn columns.
    pub fn clash_suffix(mut self, value: impl Into<String>) -> Self {
        self.reconcile.clash_suffix = value.into();
        self
    }

    /// Set the delimiter for both input and output.
    pub fn delimiter(mut self, value: u8) -> Self {
        self.read.delimiter = value;
        self.write.delimiter = value;
        self
    }

    /// Set the quote_all flag for the output.
    pub fn quote_all(mut self, value: bool) -> Self {
        self.write.quote_all = value;
        self
    }

    /// Replace the key column spellings.
    pub fn columns(mut self, value: KeyColumns) -> Self {
        self.columns = value;
        self
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    pub designite_rows: usize,
    pub churn_rows: usize,
    pub exact_matches: usize,
    pub fallback_matches: usize,
    pub unmatched_designite_rows: usize,
    /// Rows written, one per `(commit_id, file_path)`.
    pub unique_rows: usize,
    /// Absolute location of the merged CSV.
    pub output_path: PathBuf,
}

/// The in-memory result of joining two tables.
#[derive(Debug, Clone)]
pub struct Mapping {
    pub output: OutputTable,
    pub stats: JoinStats,
}

/// Runs one mapping from configuration.
pub struct Mapper {
    config: MapperConfig,
    engine: JoinEngine,
}

impl Mapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            engine: JoinEngine::new(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Load both inputs, join them and write the merged CSV.
    ///
    /// Nothing is written unless loading, key resolution and the join all
    /// succeed.
    pub fn run(&self) -> MapperResult<MapSummary> {
        let reader = TableReader::new(self.config.read.clone());
        let designite = reader.read_path(&self.config.designite_csv)?;
        let churn = reader.read_path(&self.config.churn_csv)?;
        log::info!(
            "loaded {} designite rows and {} churn rows",
            designite.len(),
            churn.len()
        );

        let mapping = self.map(&designite, &churn)?;
        let output_path = self.write(&mapping.output)?;

        Ok(MapSummary {
            designite_rows: designite.len(),
            churn_rows: churn.len(),
            exact_matches: mapping.stats.exact_matches,
            fallback_matches: mapping.stats.fallback_matches,
            unmatched_designite_rows: mapping.stats.unmatched_designite_rows,
            unique_rows: mapping.output.len(),
            output_path,
        })
    }

    /// Join two already-loaded tables.
    pub fn map(&self, designite: &Table, churn: &Table) -> MapperResult<Mapping> {
        let keys = self.config.columns.resolve(designite, churn)?;
        let schema = OutputSchema::build(designite, churn, &keys, &self.config.reconcile)?;

        let outcome = self.engine.join(designite, churn, &keys);
        let output = OutputTable::materialize(&schema, &outcome.pairs, designite, churn);

        Ok(Mapping {
            output,
            stats: outcome.stats,
        })
    }

    fn write(&self, output: &OutputTable) -> MapperResult<PathBuf> {
        let path: &Path = &self.config.output_csv;
        let absolute = std::path::absolute(path)?;
        let rows: Vec<&Vec<String>> = output.rows().collect();
        TableWriter::new(self.config.write.clone()).write_path(&absolute, output.header(), &rows)?;

        log::info!("wrote {} rows to {}", output.len(), absolute.display());
        Ok(absolute)
    }
}
