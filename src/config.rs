//! Layered settings: defaults, then an optional TOML file, then environment.
//!
//! ```toml
//! refresh = "15s"
//!
//! [display]
//! active_namespaces = ["bookinfo", "travel"]
//! home_cluster = "east"
//! graph_type = "app"
//! edge_labels = ["trafficRate", "responseTime"]
//!
//! [health]
//! endpoint = "https://kiali.example.com/kiali"
//! duration = "10m"
//! chunk_size = 50
//! ```
//!
//! Environment variables use the `MESHGRAPH_` prefix with `__` between
//! nesting levels, e.g. `MESHGRAPH_DISPLAY__HOME_CLUSTER=east` or
//! `MESHGRAPH_DISPLAY__ACTIVE_NAMESPACES=bookinfo,travel`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use meshgraph_types::DisplaySettings;
use serde::{Deserialize, Serialize};

use crate::data::duration::parse_duration;
use crate::data::health::MAX_NAMESPACES_PER_CALL;

/// Where and how namespace health is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    /// Base URL of the console API.
    pub endpoint: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: String,
    /// Telemetry window the health is computed over.
    pub duration: String,
    /// Namespaces per backend call.
    pub chunk_size: usize,
    pub cluster: Option<String>,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:20001/kiali".to_string(),
            token: None,
            timeout: "10s".to_string(),
            duration: "10m".to_string(),
            chunk_size: MAX_NAMESPACES_PER_CALL,
            cluster: None,
        }
    }
}

impl HealthSettings {
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout).context("Invalid health timeout")
    }

    pub fn duration(&self) -> Result<Duration> {
        parse_duration(&self.duration).context("Invalid health duration")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub health: HealthSettings,
    /// Poll interval when watching a graph file.
    pub refresh: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display: DisplaySettings::default(),
            health: HealthSettings::default(),
            refresh: "1s".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, layering the optional file and the environment over
    /// the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("MESHGRAPH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("display.active_namespaces")
                    .with_list_parse_key("display.edge_labels"),
            )
            .build()
            .context("Failed to load configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        parse_duration(&self.refresh).context("Invalid refresh interval")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshgraph_types::{EdgeLabelMode, GraphType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.display, DisplaySettings::default());
        assert_eq!(settings.health.chunk_size, 100);
        assert_eq!(settings.health.duration().unwrap(), Duration::from_secs(600));
        assert_eq!(settings.health.timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(settings.refresh_interval().unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_without_file_gives_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.health.endpoint, "http://localhost:20001/kiali");
        assert_eq!(settings.display.max_hosts, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
refresh = "15s"

[display]
active_namespaces = ["bookinfo", "travel"]
home_cluster = "east"
graph_type = "app"
edge_labels = ["trafficRate", "responseTime"]

[health]
duration = "1h"
chunk_size = 25
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.display.active_namespaces, ["bookinfo", "travel"]);
        assert_eq!(settings.display.home_cluster, "east");
        assert_eq!(settings.display.graph_type, GraphType::App);
        assert_eq!(
            settings.display.edge_labels,
            [EdgeLabelMode::TrafficRate, EdgeLabelMode::ResponseTime]
        );
        // Unset keys keep their defaults
        assert!(settings.display.show_missing_sidecars);
        assert_eq!(settings.health.chunk_size, 25);
        assert_eq!(settings.health.duration().unwrap(), Duration::from_secs(3600));
        assert_eq!(settings.refresh_interval().unwrap(), Duration::from_secs(15));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/meshgraph.toml"))).is_err());
    }

    #[test]
    fn test_bad_duration() {
        let settings = Settings {
            refresh: "soon".to_string(),
            ..Default::default()
        };
        assert!(settings.refresh_interval().is_err());
    }
}
