//! # meshgraph-types
//!
//! Core types for service-mesh topology telemetry. This crate defines the
//! records a mesh control plane hands to a console: the nodes and edges of a
//! traffic graph, the display settings a graph view is rendered with, and
//! the health statuses reported per namespace.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to read backend JSON
//! - **Immutable snapshots**: A [`TopologySnapshot`] is built once per refresh and never mutated
//! - **Ergonomic builders**: Fluent API for constructing snapshots in tests and tools
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON serialization via serde, using the backend's camelCase field names
//!
//! ## Example
//!
//! ```rust
//! use meshgraph_types::{NodeType, Protocol, TopologySnapshot};
//!
//! let snapshot = TopologySnapshot::builder()
//!     .node("productpage", NodeType::App, |n| {
//!         n.namespace("bookinfo").app("productpage").version("v1")
//!     })
//!     .node("reviews", NodeType::Service, |n| n.namespace("bookinfo").service("reviews"))
//!     .edge("e1", "productpage", "reviews", Protocol::Http, 12.5)
//!     .build();
//!
//! assert_eq!(snapshot.nodes.len(), 2);
//! assert_eq!(snapshot.edges.len(), 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod edge;
mod health;
mod node;
mod settings;
mod snapshot;

pub use edge::*;
pub use health::*;
pub use node::*;
pub use settings::*;
pub use snapshot::*;

/// Marker the backend uses for attributes it could not resolve.
pub const UNKNOWN: &str = "unknown";

/// Istio's default cluster name, typically indicating a single-cluster mesh.
pub const CLUSTER_DEFAULT: &str = "Kubernetes";
