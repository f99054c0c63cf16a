//! Bend-points for parallel edges.
//!
//! When several protocols are active between the same two entities the
//! renderer draws several edges over the same straight line. The first two
//! edges of such a group are bent apart into a skinny diamond: each gets one
//! bend-point at the segment midpoint, pushed [`BENDPOINT_OFFSET`] units
//! along the perpendicular in opposite directions. Any further edge stays
//! straight.
//!
//! Planning is pure in the current endpoint coordinates and must be re-run
//! after every layout pass.

use std::collections::{BTreeMap, HashMap};

use meshgraph_types::EdgeRecord;
use serde::{Deserialize, Serialize};

/// Distance of a bend-point from the straight segment, in display units.
pub const BENDPOINT_OFFSET: f64 = 20.0;

/// A position in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// What the planner needs to know about the renderer's current layout.
pub trait EdgeLayout {
    /// Where the edge leaves its source node.
    fn start_point(&self, edge_id: &str) -> Option<Point>;

    /// Where the edge enters its target node.
    fn end_point(&self, edge_id: &str) -> Option<Point>;

    /// Ids of all edges sharing this edge's (source, target) pair, itself included.
    fn parallel_edges(&self, edge_id: &str) -> Vec<String>;
}

/// Bend-point of the edge at `index` in a sorted group of `group_len` edges.
pub fn bendpoint(start: Point, end: Point, index: usize, group_len: usize) -> Option<Point> {
    if group_len < 2 || index > 1 {
        return None;
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy);
    if length == 0.0 || !length.is_finite() {
        return None;
    }

    let (nx, ny) = (-dy / length, dx / length);
    let offset = if index == 0 {
        BENDPOINT_OFFSET
    } else {
        -BENDPOINT_OFFSET
    };

    let mid = start.midpoint(end);
    Some(Point::new(mid.x + nx * offset, mid.y + ny * offset))
}

/// Bend-points for a group of parallel edges drawn between `start` and `end`.
///
/// Edges are ordered by id before planning, so the result does not depend
/// on the order the group was collected in. Each edge maps to zero or one
/// points.
pub fn plan_bendpoints<S: AsRef<str>>(
    start: Point,
    end: Point,
    group: &[S],
) -> BTreeMap<String, Vec<Point>> {
    let mut ids: Vec<&str> = group.iter().map(AsRef::as_ref).collect();
    ids.sort_unstable();

    ids.iter()
        .enumerate()
        .map(|(index, id)| {
            let points = bendpoint(start, end, index, ids.len()).into_iter().collect();
            (id.to_string(), points)
        })
        .collect()
}

/// Bend-points for one edge under the current layout.
pub fn bendpoints_for(layout: &impl EdgeLayout, edge_id: &str) -> Vec<Point> {
    let (Some(start), Some(end)) = (layout.start_point(edge_id), layout.end_point(edge_id)) else {
        return Vec::new();
    };

    let mut group = layout.parallel_edges(edge_id);
    group.sort_unstable();

    group
        .iter()
        .position(|id| id == edge_id)
        .and_then(|index| bendpoint(start, end, index, group.len()))
        .into_iter()
        .collect()
}

/// Group edges by ordered (source, target) pair, each group sorted by id.
pub fn group_parallel_edges(edges: &[EdgeRecord]) -> BTreeMap<(&str, &str), Vec<&EdgeRecord>> {
    let mut groups: BTreeMap<(&str, &str), Vec<&EdgeRecord>> = BTreeMap::new();
    for edge in edges {
        groups.entry(edge.pair()).or_default().push(edge);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.id.cmp(&b.id));
    }
    groups
}

/// An [`EdgeLayout`] over node center positions.
///
/// Edges start and end at the centers of their nodes. Used when the layout
/// engine only reports where nodes are.
#[derive(Debug, Clone)]
pub struct NodePositions<'a> {
    positions: HashMap<String, Point>,
    edges: HashMap<&'a str, &'a EdgeRecord>,
    groups: BTreeMap<(&'a str, &'a str), Vec<&'a EdgeRecord>>,
}

impl<'a> NodePositions<'a> {
    pub fn new(edges: &'a [EdgeRecord], positions: HashMap<String, Point>) -> Self {
        Self {
            positions,
            edges: edges.iter().map(|e| (e.id.as_str(), e)).collect(),
            groups: group_parallel_edges(edges),
        }
    }

    fn position(&self, node_id: &str) -> Option<Point> {
        self.positions.get(node_id).copied()
    }
}

impl EdgeLayout for NodePositions<'_> {
    fn start_point(&self, edge_id: &str) -> Option<Point> {
        self.edges
            .get(edge_id)
            .and_then(|e| self.position(&e.source))
    }

    fn end_point(&self, edge_id: &str) -> Option<Point> {
        self.edges
            .get(edge_id)
            .and_then(|e| self.position(&e.target))
    }

    fn parallel_edges(&self, edge_id: &str) -> Vec<String> {
        self.edges
            .get(edge_id)
            .and_then(|e| self.groups.get(&e.pair()))
            .map(|group| group.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default()
    }
}
