use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Default destination when no output path is given
pub const DEFAULT_OUTPUT_PATH: &str = "output.sql";

/// Foreign key dependencies extracted from a DDL source
///
/// An edge `parent -> child` means the child table declares a foreign key
/// referencing the parent, so the parent's DDL must be emitted first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Parent table -> dependent tables, one entry per foreign key declaration
    pub graph: HashMap<String, Vec<String>>,
    /// Table -> number of foreign key declarations not yet resolved
    pub in_degree: HashMap<String, usize>,
    /// Tables in the order their CREATE TABLE statements appear (duplicates kept)
    pub table_order: Vec<String>,
    /// Parent tables in the order they were first referenced
    referenced_order: Vec<String>,
    /// Names seen in a CREATE TABLE
    declared: HashSet<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a CREATE TABLE occurrence. Returns false when the name was
    /// already declared earlier in the source.
    pub fn register_table(&mut self, name: &str) -> bool {
        let first_declaration = self.declared.insert(name.to_string());
        self.graph.entry(name.to_string()).or_default();
        self.in_degree.entry(name.to_string()).or_insert(0);
        self.table_order.push(name.to_string());
        first_declaration
    }

    /// Record one foreign key declaration of `child` referencing `parent`
    pub fn add_edge(&mut self, parent: &str, child: &str) {
        if !self.graph.contains_key(parent) {
            self.referenced_order.push(parent.to_string());
        }
        self.graph
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
        self.in_degree.entry(parent.to_string()).or_insert(0);
        *self.in_degree.entry(child.to_string()).or_insert(0) += 1;
    }

    /// Number of distinct tables known to the graph, declared or only referenced
    pub fn table_count(&self) -> usize {
        self.graph.len()
    }

    /// Total number of foreign key edges
    pub fn edge_count(&self) -> usize {
        self.graph.values().map(Vec::len).sum()
    }

    pub fn dependents(&self, table: &str) -> &[String] {
        self.graph.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn in_degree(&self, table: &str) -> Option<usize> {
        self.in_degree.get(table).copied()
    }

    /// Declared tables without duplicates, in appearance order
    pub fn declared_tables(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.table_order
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }

    /// Referenced parent tables that never have a CREATE TABLE of their own
    pub fn undeclared_tables(&self) -> Vec<String> {
        self.referenced_order
            .iter()
            .filter(|t| !self.declared.contains(t.as_str()))
            .cloned()
            .collect()
    }

    /// Every table in the graph in a stable order: declared tables by first
    /// appearance, then undeclared parents by first reference
    pub fn seed_order(&self) -> Vec<String> {
        let mut order = self.declared_tables();
        order.extend(self.undeclared_tables());
        order
    }
}

/// Verbatim DDL bytes grouped per table
///
/// Blocks are kept as raw bytes so input in any encoding is copied through unchanged.
#[derive(Debug, Clone, Default)]
pub struct TableBlocks {
    /// Table -> every line from its CREATE TABLE up to the next one, `\n` terminated
    pub blocks: HashMap<String, Vec<u8>>,
    /// Lines that precede the first CREATE TABLE
    pub preamble: Vec<u8>,
    pub preamble_lines: usize,
    /// Tables whose block was replaced by a later CREATE TABLE of the same name
    pub duplicates: Vec<String>,
}

impl TableBlocks {
    pub fn get(&self, table: &str) -> Option<&[u8]> {
        self.blocks.get(table).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Configuration for a single reordering run
#[derive(Debug, Clone)]
pub struct ReorderOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Write the content preceding the first CREATE TABLE instead of dropping it
    pub keep_preamble: bool,
    /// Where to write a JSON run summary
    pub report: Option<PathBuf>,
}

impl Default for ReorderOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            keep_preamble: false,
            report: None,
        }
    }
}

impl ReorderOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_keep_preamble(mut self, keep_preamble: bool) -> Self {
        self.keep_preamble = keep_preamble;
        self
    }

    pub fn with_report(mut self, report: Option<PathBuf>) -> Self {
        self.report = report;
        self
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Declared tables in source order
    pub tables: Vec<String>,
    /// Full dependency order, including undeclared referenced tables
    pub sorted_order: Vec<String>,
    pub foreign_key_count: usize,
    /// Referenced tables with no CREATE TABLE in the input
    pub undeclared_references: Vec<String>,
    pub preamble_lines: usize,
    pub preamble_kept: bool,
    pub tables_written: usize,
    pub generated_at: DateTime<Utc>,
}

impl ReorderSummary {
    /// Sorted tables that have a block in the output, skipping undeclared references
    pub fn written_order(&self) -> impl Iterator<Item = &str> {
        self.sorted_order
            .iter()
            .filter(|t| !self.undeclared_references.contains(t))
            .map(String::as_str)
    }
}
