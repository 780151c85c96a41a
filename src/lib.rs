//! churnmap - joins Designite and churn datasets by commit and file.
//!
//! Two independently produced per-file, per-commit CSV tables are merged into
//! one table keyed by `(commit_id, file_path)`. Rows are matched on the exact
//! normalized path first and on the file basename second, for files that moved
//! between the two analyses.
//!
//! # Example
//!
//! ```no_run
//! use churnmap::mapper::{Mapper, MapperConfig};
//!
//! let config = MapperConfig::new("designite.csv", "churn.csv", "out/mapped.csv");
//! let summary = Mapper::new(config).run().unwrap();
//! println!("Mapped rows: {}", summary.unique_rows);
//! ```

pub mod join;
pub mod mapper;
pub mod table;
