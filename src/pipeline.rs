//! End-to-end reordering: extract dependencies, sort, then rewrite the DDL.
//!
//! The input is read twice, once by the extractor and once by the reassembler.
//! The output file is only created after sorting succeeds, so a cyclic input
//! never produces an output file.

use crate::ddl_parser::DependencyExtractor;
use crate::error::{DdlSortError, DdlSortResult};
use crate::reassembler::DdlReassembler;
use crate::sorter::TopologicalSorter;
use crate::types::{ReorderOptions, ReorderSummary};
use std::fs;
use std::path::Path;
use tracing::info;

/// Run the full pipeline described by `options`
pub fn process_sql(options: &ReorderOptions) -> DdlSortResult<ReorderSummary> {
    info!("Reordering DDL from {:?} into {:?}", options.input, options.output);

    info!("Step 1: Extracting table dependencies");
    let graph = DependencyExtractor::new().extract_file(&options.input)?;
    let tables = graph.declared_tables();
    let undeclared_references = graph.undeclared_tables();
    let foreign_key_count = graph.edge_count();

    info!("Step 2: Sorting {} tables by foreign key dependencies", graph.table_count());
    let sorted_order = TopologicalSorter::new().sort(graph)?;

    info!("Step 3: Reassembling DDL blocks in dependency order");
    let reassembler = DdlReassembler::new();
    let blocks = reassembler.split_file(&options.input)?;
    let tables_written = reassembler.write_file(
        &blocks,
        &sorted_order,
        options.keep_preamble,
        &options.output,
    )?;
    info!("Wrote {} table blocks to {:?}", tables_written, options.output);

    let summary = ReorderSummary {
        input: options.input.clone(),
        output: options.output.clone(),
        tables,
        sorted_order,
        foreign_key_count,
        undeclared_references,
        preamble_lines: blocks.preamble_lines,
        preamble_kept: options.keep_preamble,
        tables_written,
        generated_at: chrono::Utc::now(),
    };

    if let Some(report_path) = &options.report {
        write_report(&summary, report_path)?;
    }

    Ok(summary)
}

/// Serialize `summary` as pretty JSON to `path`
pub fn write_report(summary: &ReorderSummary, path: &Path) -> DdlSortResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)
        .map_err(|e| DdlSortError::report(format!("cannot write {:?}: {}", path, e)))?;
    info!("Run summary written to {:?}", path);
    Ok(())
}
