//! Tabular layer for churnmap.
//!
//! Everything that touches CSV bytes lives here. The join layer only ever sees
//! [`Table`]s of string records and hands back a header plus rows to write.
//!
//! # Usage
//!
//! ```ignore
//! use churnmap::table::{TableReader, TableWriter};
//!
//! let designite = TableReader::default().read_path("designite.csv".as_ref())?;
//! let header = vec!["commit_id".to_string(), "file_path".to_string()];
//! TableWriter::default().write_path("out/mapped.csv".as_ref(), &header, &[])?;
//! ```

mod error;
pub mod paths;
mod reader;
mod record;
mod writer;

pub use error::{TableError, TableResult};
pub use reader::{ReadOptions, TableReader};
pub use record::{Record, Table};
pub use writer::{TableWriter, WriteOptions};
