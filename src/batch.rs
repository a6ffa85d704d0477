//! Bounded document buffer feeding bulk inserts.

use crate::document::EnvelopeDocument;

/// Documents accumulated per bulk insert
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Ordered buffer of documents awaiting one bulk write.
#[derive(Debug)]
pub struct DocumentBatch {
    docs: Vec<EnvelopeDocument>,
    capacity: usize,
}

impl DocumentBatch {
    /// Create a batch that fills up at `capacity` documents (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            docs: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Queue a document, returning the whole batch once it is full.
    ///
    /// The returned batch holds exactly `capacity` documents and the buffer
    /// starts over empty.
    pub fn push(&mut self, doc: EnvelopeDocument) -> Option<Vec<EnvelopeDocument>> {
        self.docs.push(doc);
        if self.docs.len() >= self.capacity {
            Some(self.take())
        } else {
            None
        }
    }

    /// Hand out whatever is left, if anything.
    pub fn drain(&mut self) -> Option<Vec<EnvelopeDocument>> {
        if self.docs.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    fn take(&mut self) -> Vec<EnvelopeDocument> {
        std::mem::replace(&mut self.docs, Vec::with_capacity(self.capacity))
    }
}
