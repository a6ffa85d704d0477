//! Destinations for bulk document writes.

mod jsonl;
mod mongo;

pub use jsonl::JsonLinesSink;
pub use mongo::{redact_credentials, MongoSink};

use crate::document::EnvelopeDocument;
use crate::error::ImportError;

/// A store that accepts documents one batch at a time.
pub trait DocumentSink {
    /// Persist one batch. A failure leaves earlier batches untouched.
    fn insert_many(&mut self, docs: &[EnvelopeDocument]) -> Result<(), ImportError>;

    /// Called once after the last batch.
    fn finish(&mut self) -> Result<(), ImportError> {
        Ok(())
    }

    /// Human-readable target, used in log lines.
    fn describe(&self) -> String;
}

/// Counts documents and discards them. Backs dry runs.
#[derive(Debug, Default)]
pub struct NullSink {
    pub documents: u64,
    pub batches: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSink for NullSink {
    fn insert_many(&mut self, docs: &[EnvelopeDocument]) -> Result<(), ImportError> {
        self.documents += docs.len() as u64;
        self.batches += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "dry run".to_string()
    }
}
