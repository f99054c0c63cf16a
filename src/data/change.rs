//! Did the shape of the graph change?
//!
//! Re-layout is expensive, so a refresh that only updates attributes (rates,
//! health, flags) keeps the current layout. The shape is the set of node ids
//! and the set of edge ids; nothing else is compared.

use std::ptr;

use meshgraph_types::TopologySnapshot;

/// Whether `next` needs a fresh layout compared to `prev`.
///
/// A missing snapshot on either side counts as a change.
pub fn topology_changed(prev: Option<&TopologySnapshot>, next: Option<&TopologySnapshot>) -> bool {
    let (prev, next) = match (prev, next) {
        (Some(prev), Some(next)) => (prev, next),
        _ => return true,
    };

    if ptr::eq(prev, next) {
        return false;
    }

    if prev.nodes.len() != next.nodes.len() || prev.edges.len() != next.edges.len() {
        return true;
    }

    sorted_ids(prev.nodes.iter().map(|n| n.id.as_str()))
        != sorted_ids(next.nodes.iter().map(|n| n.id.as_str()))
        || sorted_ids(prev.edges.iter().map(|e| e.id.as_str()))
            != sorted_ids(next.edges.iter().map(|e| e.id.as_str()))
}

fn sorted_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut ids: Vec<&str> = ids.collect();
    ids.sort_unstable();
    ids
}
