//! File-based topology source.
//!
//! Polls a graph payload file written by the backend or saved from the
//! console API.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use meshgraph_types::TopologySnapshot;
use tracing::{debug, warn};

use super::{parse_graph, TopologySource};
use crate::error::GraphError;

/// Read and parse a graph payload file once.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<TopologySnapshot, GraphError> {
    let content = fs::read_to_string(path)?;
    parse_graph(&content)
}

/// A source that reads graph payloads from a JSON file.
///
/// The file's modification time is tracked and a snapshot is only returned
/// when the file has been rewritten since the last successful read.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<TopologySnapshot> {
        match load_graph(&self.path) {
            Ok(snapshot) => {
                self.last_error = None;
                Some(snapshot)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load graph file");
                self.last_error = Some(match e {
                    GraphError::Io(e) => format!("Read error: {}", e),
                    other => format!("Parse error: {}", other),
                });
                None
            }
        }
    }
}

impl TopologySource for FileSource {
    fn poll(&mut self) -> Option<TopologySnapshot> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            // File disappeared; keep the last graph.
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        let snapshot = self.read_file()?;
        self.last_modified = current_modified;
        debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Loaded graph"
        );
        Some(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
