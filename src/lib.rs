//! # meshgraph
//!
//! The topology core of a service-mesh console: everything between a
//! telemetry snapshot and the renderer.
//!
//! Each refresh delivers a [`TopologySnapshot`] of nodes and edges. From it
//! the crate derives node decorations (shape, badges, label, hosts),
//! rate-proportional edge animation delays, edge labels, bend-points for
//! parallel edges and whether the graph needs a new layout. Namespace
//! health is fetched in chunks and rolled up to a worst status per
//! namespace.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Consumer                            │
//! │  ┌─────────┐    ┌──────────┐    ┌───────────┐    ┌────────┐  │
//! │  │ source  │───▶│ session  │───▶│ GraphView │───▶│Renderer│  │
//! │  │ (input) │    │ (state)  │    │  (JSON)   │    │        │  │
//! │  └─────────┘    └────┬─────┘    └───────────┘    └───┬────┘  │
//! │                      │                               │       │
//! │                      ▼                               ▼       │
//! │                 ┌──────────┐                   EdgeLayout    │
//! │                 │   data   │◀── bend-points ───────┘         │
//! │                 └────┬─────┘                                 │
//! │                      │                                       │
//! │                      ▼                                       │
//! │              HealthFetcher (meshgraph-adapters)              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: [`TopologySource`] trait with file polling and channel
//!   implementations, plus parsing of the backend's graph payload
//! - **[`session`]**: [`GraphSession`] keeps calibration and the previous
//!   snapshot across refreshes and assembles the [`GraphView`]
//! - **[`data`]**: The pure derivations: animation, geometry, decoration,
//!   edge labels, change detection and namespace health
//! - **[`config`]**: Layered [`Settings`] from defaults, file and environment
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Print the derived view of a saved graph
//! meshgraph --file graph.json
//!
//! # Roll up namespace health from a live console
//! meshgraph --health --namespaces bookinfo,travel --endpoint http://localhost:20001/kiali
//! ```
//!
//! ### As a library
//!
//! ```
//! use meshgraph::{DisplaySettings, GraphSession, NodeType, Protocol, TopologySnapshot};
//!
//! let snapshot = TopologySnapshot::builder()
//!     .node("a", NodeType::App, |n| n.app("productpage").namespace("bookinfo"))
//!     .node("b", NodeType::App, |n| n.app("reviews").namespace("bookinfo"))
//!     .edge("a-b", "a", "b", Protocol::Http, 4.0)
//!     .build();
//!
//! let mut session = GraphSession::new(DisplaySettings::default());
//! let update = session.update(snapshot);
//!
//! assert!(update.relayout);
//! assert_eq!(update.view.edge("a-b").unwrap().delay_ms, Some(250.0));
//! ```
//!
//! ### Publishing namespace health
//!
//! ```no_run
//! use std::time::Duration;
//! use meshgraph::data::{Liveness, NamespaceHealthAggregator};
//! use meshgraph_adapters::kiali::KialiHealthClient;
//! use tokio::sync::watch;
//!
//! # tokio_test::block_on(async {
//! let client = KialiHealthClient::builder().build();
//! let aggregator = NamespaceHealthAggregator::new(client, Duration::from_secs(600));
//!
//! let (tx, _rx) = watch::channel(Default::default());
//! let (liveness, _guard) = Liveness::new();
//! let namespaces = vec!["bookinfo".to_string()];
//! aggregator.refresh(&namespaces, &liveness, &tx).await.unwrap();
//! # });
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod source;

pub use config::{HealthSettings, Settings};
pub use data::{
    AnimationSpeed, Badge, NamespaceHealthAggregator, NamespaceRollup, NodeDecoration, NodeShape,
    Point, RateAnimationCalibrator,
};
pub use error::GraphError;
pub use session::{EdgeView, GraphSession, GraphView, NodeView, ViewUpdate};
pub use source::{ChannelSource, FileSource, TopologySource};

pub use meshgraph_adapters::{HealthFetcher, HealthMap};
pub use meshgraph_types::{
    BoxKind, DisplaySettings, EdgeLabelMode, EdgeRecord, GraphType, HealthStatus,
    NamespaceHealth, NamespaceStatus, NodeRecord, NodeType, Protocol, TopologySnapshot,
    TrafficKind,
};
