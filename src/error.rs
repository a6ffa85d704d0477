//! Error kinds surfaced by an import run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop an import.
///
/// Rows sitting in an unflushed batch when one of these is returned are not
/// persisted; batches flushed before the failure stay in the store.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The dump could not be opened, read or decompressed.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document store could not be reached.
    #[error("cannot connect to {uri}: {reason}")]
    Connect { uri: String, reason: String },

    /// A bulk write was rejected or could not be completed.
    #[error("bulk insert of {documents} documents failed: {reason}")]
    Write { documents: usize, reason: String },
}

impl ImportError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn connect(uri: &str, reason: impl ToString) -> Self {
        ImportError::Connect {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn write(documents: usize, reason: impl ToString) -> Self {
        ImportError::Write {
            documents,
            reason: reason.to_string(),
        }
    }
}
