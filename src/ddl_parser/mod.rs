// Dependency extraction from textual DDL
pub mod extractor;
pub mod lines;
pub mod patterns;


pub use extractor::DependencyExtractor;
pub use lines::for_each_raw_line;
pub use patterns::{match_create_table, match_foreign_key_reference};
