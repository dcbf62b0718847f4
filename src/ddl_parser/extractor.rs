use crate::ddl_parser::lines::for_each_raw_line;
use crate::ddl_parser::patterns::{match_create_table, match_foreign_key_reference};
use crate::error::{DdlSortError, DdlSortResult};
use crate::types::DependencyGraph;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Builds the foreign key dependency graph from DDL text, one line at a time
#[derive(Debug, Default)]
pub struct DependencyExtractor;

/// Scan state carried between lines
#[derive(Default)]
struct ExtractionState {
    graph: DependencyGraph,
    current_table: Option<String>,
}

impl ExtractionState {
    fn feed(&mut self, raw_line: &[u8]) {
        let line = raw_line.trim_ascii();

        if let Some(table) = match_create_table(line) {
            if !self.graph.register_table(&table) {
                warn!("Table '{}' is declared more than once", table);
            }
            debug!("Found table '{}'", table);
            self.current_table = Some(table);
        }

        if let Some(parent) = match_foreign_key_reference(line) {
            match self.current_table.as_deref() {
                Some(child) => {
                    if child == parent {
                        debug!("Table '{}' references itself", child);
                    } else {
                        debug!("Table '{}' references '{}'", child, parent);
                    }
                    self.graph.add_edge(&parent, child);
                }
                None => {
                    debug!("Ignoring reference to '{}' outside any CREATE TABLE", parent);
                }
            }
        }
    }

    fn finish(self) -> DependencyGraph {
        let undeclared = self.graph.undeclared_tables();
        if !undeclared.is_empty() {
            warn!(
                "Foreign keys reference tables not declared in the input: {}",
                undeclared.join(", ")
            );
        }
        info!(
            "Extracted {} tables with {} foreign key references",
            self.graph.declared_tables().len(),
            self.graph.edge_count()
        );
        self.graph
    }
}

impl DependencyExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Open `path` and extract its dependency graph
    pub fn extract_file(&self, path: &Path) -> DdlSortResult<DependencyGraph> {
        let file = File::open(path).map_err(|e| DdlSortError::input_open(path, e))?;
        self.extract(BufReader::new(file))
            .map_err(|e| DdlSortError::input_read(path, e))
    }

    /// Extract from any buffered reader; fails only on read errors, never on encoding
    pub fn extract<R: BufRead>(&self, reader: R) -> std::io::Result<DependencyGraph> {
        let mut state = ExtractionState::default();
        for_each_raw_line(reader, |line| state.feed(line))?;
        Ok(state.finish())
    }

    /// Extract from lines already held in memory
    pub fn extract_lines<I, S>(&self, lines: I) -> DependencyGraph
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut state = ExtractionState::default();
        for line in lines {
            state.feed(line.as_ref());
        }
        state.finish()
    }
}
