//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Rejection from [`KeyedStore::put`](crate::KeyedStore::put).
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum InsertError {
    /// The key is already present; the store was not modified.
    #[error("duplicate key")]
    DuplicateKey,
}

/// Failures reported by graph queries and dataset loading.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The id does not name a node in the graph.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// Both ids exist but no chain of edges joins them.
    #[error("no path from {from} to {to}")]
    NoPath { from: String, to: String },

    /// The dataset header is missing or is not two non-negative integers.
    #[error("invalid dataset header: {0}")]
    InvalidHeader(String),

    /// The dataset could not be opened or read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GraphError {
    pub fn is_invalid_id(&self) -> bool {
        matches!(self, GraphError::InvalidId(_))
    }

    pub fn is_no_path(&self) -> bool {
        matches!(self, GraphError::NoPath { .. })
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
