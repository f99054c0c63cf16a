//! Channel-based topology source.
//!
//! Receives snapshots through a tokio watch channel, for embedders that
//! fetch the graph themselves and push each refresh.

use meshgraph_types::TopologySnapshot;
use tokio::sync::watch;

use super::TopologySource;

/// A source fed through a watch channel.
///
/// Only the latest snapshot is kept; refreshes pushed faster than the
/// consumer polls are collapsed.
///
/// # Example
///
/// ```
/// use meshgraph::{ChannelSource, TopologySnapshot, TopologySource};
///
/// let (tx, mut source) = ChannelSource::create("console");
/// tx.send(TopologySnapshot::new()).unwrap();
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<TopologySnapshot>,
    description: String,
    initial_returned: bool,
}

impl ChannelSource {
    pub fn new(receiver: watch::Receiver<TopologySnapshot>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            initial_returned: false,
        }
    }

    /// Create a channel pair; returns (sender, source).
    pub fn create(source_description: &str) -> (watch::Sender<TopologySnapshot>, Self) {
        let (tx, rx) = watch::channel(TopologySnapshot::default());
        (tx, Self::new(rx, source_description))
    }
}

impl TopologySource for ChannelSource {
    fn poll(&mut self) -> Option<TopologySnapshot> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}
