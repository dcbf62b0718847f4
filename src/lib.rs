pub mod error;
pub mod types;
pub mod ddl_parser;
pub mod sorter;
pub mod reassembler;
pub mod pipeline;

pub use error::{DdlSortError, DdlSortResult};
pub use pipeline::process_sql;
pub use types::{DependencyGraph, ReorderOptions, ReorderSummary, TableBlocks};
