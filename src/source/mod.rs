//! Topology source abstraction for receiving graph snapshots.
//!
//! A source hands over the latest [`TopologySnapshot`] whenever the backend
//! refreshes its telemetry: by rewriting a graph file or by pushing through
//! an in-memory channel.

mod channel;
mod file;
pub mod payload;

pub use channel::ChannelSource;
pub use file::{load_graph, FileSource};
pub use payload::{parse_graph, GraphPayload};

use std::fmt::Debug;

use meshgraph_types::TopologySnapshot;

/// Trait for receiving topology snapshots from various sources.
///
/// # Example
///
/// ```
/// use meshgraph::{FileSource, TopologySource};
///
/// let mut source = FileSource::new("graph.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} nodes", snapshot.len());
/// }
/// ```
pub trait TopologySource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if a new refresh is available, `None`
    /// otherwise. Never blocks.
    fn poll(&mut self) -> Option<TopologySnapshot>;

    /// Human-readable description of where snapshots come from.
    fn description(&self) -> &str;

    /// The error from the last poll, if it failed.
    fn error(&self) -> Option<&str>;
}
