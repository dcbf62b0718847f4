use crate::ddl_parser::{for_each_raw_line, match_create_table};
use crate::error::{DdlSortError, DdlSortResult};
use crate::types::TableBlocks;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Splits DDL source into byte-exact per-table blocks and writes them back in a given order
#[derive(Debug, Default)]
pub struct DdlReassembler;

#[derive(Default)]
struct BlockCollector {
    blocks: TableBlocks,
    open: Option<(String, Vec<u8>)>,
}

impl BlockCollector {
    fn feed(&mut self, line: &[u8]) {
        if let Some(table) = match_create_table(line) {
            self.seal();
            self.open = Some((table, Vec::new()));
        }

        match self.open.as_mut() {
            Some((_, text)) => {
                text.extend_from_slice(line);
                text.push(b'\n');
            }
            None => {
                self.blocks.preamble.extend_from_slice(line);
                self.blocks.preamble.push(b'\n');
                self.blocks.preamble_lines += 1;
            }
        }
    }

    fn seal(&mut self) {
        if let Some((table, text)) = self.open.take() {
            debug!("Captured {} bytes of DDL for table '{}'", text.len(), table);
            if self.blocks.blocks.insert(table.clone(), text).is_some() {
                warn!("Replacing earlier DDL block for duplicate table '{}'", table);
                self.blocks.duplicates.push(table);
            }
        }
    }

    fn finish(mut self) -> TableBlocks {
        self.seal();
        if self.blocks.preamble_lines > 0 {
            debug!(
                "{} lines precede the first CREATE TABLE",
                self.blocks.preamble_lines
            );
        }
        self.blocks
    }
}

impl DdlReassembler {
    pub fn new() -> Self {
        Self
    }

    /// Open `path` and split it into table blocks
    pub fn split_file(&self, path: &Path) -> DdlSortResult<TableBlocks> {
        let file = File::open(path).map_err(|e| DdlSortError::input_open(path, e))?;
        let blocks = self
            .split(BufReader::new(file))
            .map_err(|e| DdlSortError::input_read(path, e))?;
        info!("Captured DDL blocks for {} tables", blocks.len());
        Ok(blocks)
    }

    pub fn split<R: BufRead>(&self, reader: R) -> std::io::Result<TableBlocks> {
        let mut collector = BlockCollector::default();
        for_each_raw_line(reader, |line| collector.feed(line))?;
        Ok(collector.finish())
    }

    pub fn split_lines<I, S>(&self, lines: I) -> TableBlocks
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut collector = BlockCollector::default();
        for line in lines {
            collector.feed(line.as_ref());
        }
        collector.finish()
    }

    /// Write the blocks named in `order` to `writer`. Names without a block are
    /// skipped. Returns the number of table blocks written.
    pub fn write_ordered<W: Write>(
        &self,
        blocks: &TableBlocks,
        order: &[String],
        keep_preamble: bool,
        mut writer: W,
    ) -> std::io::Result<usize> {
        if keep_preamble {
            writer.write_all(&blocks.preamble)?;
        } else if blocks.preamble_lines > 0 {
            warn!(
                "Dropping {} lines that precede the first CREATE TABLE",
                blocks.preamble_lines
            );
        }

        let mut written = 0;
        for table in order {
            match blocks.get(table) {
                Some(text) => {
                    writer.write_all(text)?;
                    written += 1;
                }
                None => debug!("No DDL block for table '{}', skipping", table),
            }
        }
        writer.flush()?;
        Ok(written)
    }

    /// Create `path` and write the ordered blocks to it
    pub fn write_file(
        &self,
        blocks: &TableBlocks,
        order: &[String],
        keep_preamble: bool,
        path: &Path,
    ) -> DdlSortResult<usize> {
        let file = File::create(path).map_err(|e| DdlSortError::output_create(path, e))?;
        self.write_ordered(blocks, order, keep_preamble, BufWriter::new(file))
            .map_err(|e| DdlSortError::output_write(path, e))
    }
}
