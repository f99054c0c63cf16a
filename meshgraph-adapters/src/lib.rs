//! # meshgraph-adapters
//!
//! Adapters for the collaborators the topology core talks to.
//!
//! The core never issues network calls itself. Namespace health is fetched
//! through the [`HealthFetcher`] trait, and this crate ships the HTTP
//! implementation against the mesh console API.
//!
//! ## Supported Backends
//!
//! - **Kiali-compatible console API** (`http` feature) - Fetches per-namespace
//!   app, service and workload health from `/api/clusters/health`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "http")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use meshgraph_adapters::kiali::KialiHealthClient;
//! use meshgraph_adapters::HealthFetcher;
//! use std::time::Duration;
//!
//! let client = KialiHealthClient::builder()
//!     .endpoint("http://localhost:20001/kiali")
//!     .build();
//!
//! let namespaces = vec!["bookinfo".to_string()];
//! let health = client
//!     .fetch_health(&namespaces, Duration::from_secs(600), None)
//!     .await?;
//!
//! println!("Fetched health for {} namespaces", health.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fetcher;
pub mod model;

#[cfg(feature = "http")]
pub mod kiali;

pub use error::AdapterError;
pub use fetcher::{HealthFetcher, HealthMap};

// Re-export types for convenience
pub use meshgraph_types::{HealthStatus, NamespaceHealth};
