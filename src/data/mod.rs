//! The topology core: everything derived from a snapshot.
//!
//! ## Submodules
//!
//! - [`animation`]: Rate-proportional animation delays with per-category calibration
//! - [`geometry`]: Bend-points separating parallel edges
//! - [`decorate`]: Node shape, badges, label and host list
//! - [`edge_label`]: Edge label text for the active label modes
//! - [`change`]: Whether a refresh changed the shape of the graph
//! - [`health`]: Chunked namespace health fetching and worst-status rollup
//! - [`duration`]: Parsing of duration strings (e.g., "10m", "30s")
//!
//! ## Data Flow
//!
//! ```text
//! TopologySnapshot (one refresh)
//!        │
//!        ├──▶ topology_changed()  ──▶ relayout?
//!        │
//!        ├──▶ decorate()          ──▶ NodeDecoration per node
//!        │
//!        └──▶ calibrate() ──▶ compute_delay() / edge_label() per edge
//!
//! EdgeLayout (after every layout pass)
//!        │
//!        └──▶ bendpoints_for()    ──▶ 0 or 1 bend-points per edge
//! ```

pub mod animation;
pub mod change;
pub mod decorate;
pub mod duration;
pub mod edge_label;
pub mod geometry;
pub mod health;

pub use animation::{AnimationSpeed, AnimationTimer, CalibrationState, RateAnimationCalibrator};
pub use change::topology_changed;
pub use decorate::{
    decorate, decorate_snapshot, AncestryLookup, Badge, NodeDecoration, NodeShape, TopologyIndex,
};
pub use edge_label::edge_label;
pub use geometry::{
    bendpoints_for, group_parallel_edges, plan_bendpoints, EdgeLayout, NodePositions, Point,
};
pub use health::{
    fetch_namespace_health, rollup, worst_status, Liveness, LivenessGuard,
    NamespaceHealthAggregator, NamespaceRollup, RefreshOutcome,
};
