//! The import pass: read lines, extract rows, wrap them, write in batches.

use crate::batch::DocumentBatch;
use crate::config::ImportConfig;
use crate::document::EnvelopeDocument;
use crate::error::ImportError;
use crate::input::open_dump;
use crate::progress::ProgressReader;
use crate::scanner::{self, DumpLines};
use crate::sink::DocumentSink;
use std::cell::Cell;
use std::io::{BufRead, Read};
use std::rc::Rc;
use tracing::{debug, info};

/// Counters for one import run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    /// Lines read from the dump
    pub lines_read: u64,
    /// Lines that passed the insert heuristic
    pub insert_lines: u64,
    /// Documents handed to the sink
    pub rows_imported: u64,
    /// Bulk writes performed, remainder included
    pub batches_flushed: u64,
    /// On-disk bytes consumed (0 when reading from a caller-supplied reader)
    pub bytes_processed: u64,
}

/// Single forward pass over one dump.
///
/// ```ignore
/// let config = ImportConfig::new("backup.sql");
/// let mut sink = MongoSink::connect(&config.store)?;
/// let stats = Importer::new(config)
///     .on_flush(|total| println!("Processed {} records...", total))
///     .run(&mut sink)?;
/// ```
pub struct Importer {
    config: ImportConfig,
    progress_fn: Option<Box<dyn Fn(u64)>>,
    flush_fn: Option<Box<dyn FnMut(u64)>>,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        Self {
            config,
            progress_fn: None,
            flush_fn: None,
        }
    }

    /// Receive the running total of on-disk bytes read.
    pub fn with_progress<F: Fn(u64) + 'static>(mut self, f: F) -> Self {
        self.progress_fn = Some(Box::new(f));
        self
    }

    /// Receive the running row total after every full-batch flush.
    ///
    /// Not called for the final partial batch.
    pub fn on_flush<F: FnMut(u64) + 'static>(mut self, f: F) -> Self {
        self.flush_fn = Some(Box::new(f));
        self
    }

    /// Import the configured input file.
    pub fn run(mut self, sink: &mut dyn DocumentSink) -> Result<ImportStats, ImportError> {
        let path = self.config.input.clone();
        let bytes_read = Rc::new(Cell::new(0u64));
        let counter = bytes_read.clone();
        let progress_fn = self.progress_fn.take();

        let reader = open_dump(&path, move |file| -> Box<dyn Read> {
            Box::new(ProgressReader::new(file, move |total| {
                counter.set(total);
                if let Some(cb) = &progress_fn {
                    cb(total);
                }
            }))
        })
        .map_err(|e| ImportError::io(&path, e))?;

        let mut stats = self.run_reader(reader, sink)?;
        stats.bytes_processed = bytes_read.get();
        Ok(stats)
    }

    /// Import from an already opened reader.
    ///
    /// Read errors are attributed to the configured input path.
    pub fn run_reader<R: BufRead>(
        mut self,
        reader: R,
        sink: &mut dyn DocumentSink,
    ) -> Result<ImportStats, ImportError> {
        info!(
            input = %self.config.input.display(),
            target = %sink.describe(),
            batch_size = self.config.batch_size,
            "starting import"
        );

        let mut batch = DocumentBatch::new(self.config.batch_size);
        let mut stats = ImportStats::default();

        for line in DumpLines::new(reader) {
            let line = line.map_err(|e| ImportError::io(&self.config.input, e))?;
            stats.lines_read += 1;

            if !scanner::is_insert_line(&line) {
                continue;
            }
            stats.insert_lines += 1;

            for row in scanner::extract_rows(&line) {
                let doc = EnvelopeDocument::new(self.config.metadata.clone(), row);
                stats.rows_imported += 1;

                if let Some(full) = batch.push(doc) {
                    sink.insert_many(&full)?;
                    stats.batches_flushed += 1;
                    debug!(
                        documents = full.len(),
                        total = stats.rows_imported,
                        "flushed batch"
                    );
                    if let Some(cb) = self.flush_fn.as_mut() {
                        cb(stats.rows_imported);
                    }
                }
            }
        }

        if let Some(rest) = batch.drain() {
            sink.insert_many(&rest)?;
            stats.batches_flushed += 1;
            debug!(documents = rest.len(), "flushed final batch");
        }
        sink.finish()?;

        info!(
            rows = stats.rows_imported,
            batches = stats.batches_flushed,
            lines = stats.lines_read,
            "import finished"
        );
        Ok(stats)
    }
}
