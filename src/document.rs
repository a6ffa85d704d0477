//! Envelope documents written to the store, one per extracted row.

use serde::{Deserialize, Serialize};

/// Raw field tokens of one parenthesized VALUES group, in column order.
///
/// No type inference happens: numbers, dates and `NULL` stay text.
pub type RowTuple = Vec<String>;

pub const DEFAULT_SOURCE: &str = "CoreBanking_Backup_2022";
pub const DEFAULT_BRANCH: &str = "Shebedino";

/// Static labels stamped on every document of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: String,
    pub branch: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

/// `{ "metadata": { "source", "branch" }, "data": [..] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeDocument {
    pub metadata: DocumentMetadata,
    pub data: RowTuple,
}

impl EnvelopeDocument {
    pub fn new(metadata: DocumentMetadata, data: RowTuple) -> Self {
        Self { metadata, data }
    }
}
