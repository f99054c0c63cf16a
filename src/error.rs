//! Errors surfaced by the library.

use meshgraph_adapters::AdapterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Reading a topology file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The topology payload could not be parsed.
    #[error("Failed to parse topology: {0}")]
    Parse(String),

    /// Fetching namespace health failed.
    #[error("Health fetch failed: {0}")]
    Health(#[from] AdapterError),
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Parse(err.to_string())
    }
}
