//! End-to-end mapping: load, resolve, join, reconcile, write.

mod api;
mod error;

pub use api::{MapSummary, Mapper, MapperConfig, Mapping};
pub use error::{MapperError, MapperResult};
