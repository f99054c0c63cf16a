//! Health adapter for the Kiali-compatible console API.
//!
//! Namespace health is served by `GET /api/clusters/health`, which takes a
//! comma-separated namespace list, a rate interval and an optional cluster.
//! Every app, service and workload in the response carries a status the
//! backend already calculated.
//!
//! ## Example
//!
//! ```rust,no_run
//! use meshgraph_adapters::kiali::KialiHealthClient;
//! use meshgraph_adapters::HealthFetcher;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KialiHealthClient::builder()
//!         .endpoint("http://localhost:20001/kiali")
//!         .token("my-service-account-token")
//!         .build();
//!
//!     let namespaces = vec!["bookinfo".to_string(), "travel".to_string()];
//!     let health = client
//!         .fetch_health(&namespaces, Duration::from_secs(600), Some("east"))
//!         .await?;
//!
//!     for (namespace, health) in &health {
//!         println!("{}: {} apps", namespace, health.app_health.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request};
use tracing::debug;

use crate::model::ClustersHealth;
use crate::{AdapterError, HealthFetcher, HealthMap};

/// HTTP client for namespace health.
#[derive(Debug, Clone)]
pub struct KialiHealthClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl KialiHealthClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> KialiHealthClientBuilder {
        KialiHealthClientBuilder::default()
    }

    /// The console endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn health_request(
        &self,
        namespaces: &[String],
        duration: Duration,
        cluster: Option<&str>,
    ) -> Result<Request, AdapterError> {
        let url = format!("{}/api/clusters/health", self.endpoint);

        let mut query = vec![
            ("namespaces", namespaces.join(",")),
            ("rateInterval", format!("{}s", duration.as_secs())),
        ];
        if let Some(cluster) = cluster {
            query.push(("clusterName", cluster.to_string()));
        }

        let mut request = self.client.get(&url).query(&query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        Ok(request.build()?)
    }
}

#[async_trait]
impl HealthFetcher for KialiHealthClient {
    async fn fetch_health(
        &self,
        namespaces: &[String],
        duration: Duration,
        cluster: Option<&str>,
    ) -> Result<HealthMap, AdapterError> {
        let request = self.health_request(namespaces, duration, cluster)?;
        debug!(url = %request.url(), count = namespaces.len(), "Fetching namespace health");

        let response = self.client.execute(request).await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AdapterError::Http(format!(
                "Not authorized to read health (status {})",
                response.status()
            )));
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AdapterError::Unsupported(
                "cluster health endpoint not available".to_string(),
            ));
        }

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let health: ClustersHealth = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        Ok(health.into_namespace_health())
    }
}

/// Builder for KialiHealthClient.
#[derive(Debug, Default)]
pub struct KialiHealthClientBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl KialiHealthClientBuilder {
    /// Set the console endpoint (e.g., "http://localhost:20001/kiali").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> KialiHealthClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:20001/kiali".to_string());

        KialiHealthClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: self.token,
        }
    }
}
