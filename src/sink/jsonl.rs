use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::document::EnvelopeDocument;
use crate::error::ImportError;

use super::DocumentSink;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Newline-delimited JSON export, one envelope document per line.
///
/// Each batch is flushed to the underlying writer before `insert_many`
/// returns, so a later failure never loses an acknowledged batch.
pub struct JsonLinesSink {
    writer: BufWriter<Box<dyn Write>>,
    target: String,
    lines_written: u64,
}

impl JsonLinesSink {
    /// Create (or truncate) `path`, making parent directories as needed.
    pub fn create(path: &Path) -> Result<Self, ImportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ImportError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| ImportError::io(path, e))?;
        Ok(Self::from_writer(Box::new(file), path.display().to_string()))
    }

    pub fn from_writer(writer: Box<dyn Write>, target: impl Into<String>) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, writer),
            target: target.into(),
            lines_written: 0,
        }
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

impl DocumentSink for JsonLinesSink {
    fn insert_many(&mut self, docs: &[EnvelopeDocument]) -> Result<(), ImportError> {
        for doc in docs {
            serde_json::to_writer(&mut self.writer, doc)
                .map_err(|e| ImportError::write(docs.len(), e))?;
            self.writer
                .write_all(b"\n")
                .map_err(|e| ImportError::write(docs.len(), e))?;
        }
        self.writer
            .flush()
            .map_err(|e| ImportError::write(docs.len(), e))?;
        self.lines_written += docs.len() as u64;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ImportError> {
        self.writer.flush().map_err(|e| ImportError::write(0, e))
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}
