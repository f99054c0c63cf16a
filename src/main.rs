use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use meshgraph::source::{load_graph, FileSource, TopologySource};
use meshgraph::{GraphSession, GraphType, Protocol, Settings, ViewUpdate};

#[derive(Parser, Debug)]
#[command(name = "meshgraph")]
#[command(about = "Derive the decorated, animated view of a service-mesh traffic graph")]
struct Args {
    /// Path to a graph payload JSON file
    #[arg(short, long, required_unless_present = "health")]
    file: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Graph type: app, service, versionedApp or workload
    #[arg(long, value_parser = parse_graph_type)]
    graph_type: Option<GraphType>,

    /// Active namespaces, comma separated
    #[arg(short, long, value_delimiter = ',')]
    namespaces: Vec<String>,

    /// Cluster the console runs in
    #[arg(long)]
    home_cluster: Option<String>,

    /// Keep polling the file and log every refresh
    #[arg(short, long, conflicts_with_all = ["export", "health"])]
    watch: bool,

    /// Fetch and print the namespace health rollup instead of a graph view
    #[arg(long)]
    health: bool,

    /// Console API base URL (used with --health)
    #[arg(long, requires = "health")]
    endpoint: Option<String>,

    /// Health telemetry window (e.g., "10m", "1h")
    #[arg(long, requires = "health")]
    duration: Option<String>,

    /// Restrict health to one cluster
    #[arg(long, requires = "health")]
    cluster: Option<String>,

    /// Export the derived view to a JSON file instead of printing it
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn parse_graph_type(s: &str) -> Result<GraphType, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unknown graph type: {}", s))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meshgraph=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;

    if args.health {
        return run_health(&settings, args.export.as_deref());
    }

    let path = args
        .file
        .as_deref()
        .ok_or_else(|| anyhow!("--file is required"))?;

    if args.watch {
        return run_watch(path, &settings);
    }

    let snapshot =
        load_graph(path).with_context(|| format!("Failed to load {}", path.display()))?;

    let protocols = [Protocol::Http, Protocol::Grpc, Protocol::Tcp]
        .map(|p| (p.as_str(), snapshot.total_rate(p)));

    let mut session = GraphSession::new(settings.display.clone());
    let update = session.update(snapshot);

    match args.export {
        Some(export_path) => export_to_file(&update, &protocols, &export_path),
        None => {
            println!("{}", serde_json::to_string_pretty(&update.view)?);
            Ok(())
        }
    }
}

/// Settings from file and environment, then CLI overrides.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(graph_type) = args.graph_type {
        settings.display.graph_type = graph_type;
    }
    if !args.namespaces.is_empty() {
        settings.display.active_namespaces = args.namespaces.clone();
    }
    if let Some(ref cluster) = args.home_cluster {
        settings.display.home_cluster = cluster.clone();
    }
    if let Some(ref endpoint) = args.endpoint {
        settings.health.endpoint = endpoint.clone();
    }
    if let Some(ref duration) = args.duration {
        settings.health.duration = duration.clone();
    }
    if args.cluster.is_some() {
        settings.health.cluster = args.cluster.clone();
    }

    Ok(settings)
}

/// Poll the graph file and report every refresh.
fn run_watch(path: &Path, settings: &Settings) -> Result<()> {
    let interval = settings.refresh_interval()?;
    let mut source = FileSource::new(path);
    let mut session = GraphSession::new(settings.display.clone());
    let mut last_error: Option<String> = None;

    info!(source = source.description(), ?interval, "Watching graph");

    loop {
        if let Some(snapshot) = source.poll() {
            let update = session.update(snapshot);
            let animated = update
                .view
                .edges
                .iter()
                .filter(|e| e.delay_ms.is_some())
                .count();
            info!(
                relayout = update.relayout,
                nodes = update.view.nodes.len(),
                edges = update.view.edges.len(),
                animated,
                "Graph refreshed"
            );
        }

        let error = source.error().map(str::to_string);
        if error != last_error {
            if let Some(ref e) = error {
                warn!(error = %e, "Graph source error");
            }
            last_error = error;
        }

        thread::sleep(interval);
    }
}

/// Fetch namespace health for the active namespaces and print the rollup.
#[cfg(feature = "http")]
fn run_health(settings: &Settings, export: Option<&Path>) -> Result<()> {
    use meshgraph::data::{rollup, Liveness, NamespaceHealthAggregator, RefreshOutcome};
    use meshgraph::HealthMap;
    use meshgraph_adapters::kiali::KialiHealthClient;
    use tokio::sync::watch;

    let namespaces = &settings.display.active_namespaces;
    if namespaces.is_empty() {
        bail!("No namespaces selected; pass --namespaces or set display.active_namespaces");
    }

    let mut builder = KialiHealthClient::builder()
        .endpoint(&settings.health.endpoint)
        .timeout(settings.health.timeout()?);
    if let Some(ref token) = settings.health.token {
        builder = builder.token(token);
    }

    let aggregator = NamespaceHealthAggregator::new(builder.build(), settings.health.duration()?)
        .with_chunk_size(settings.health.chunk_size)
        .with_cluster(settings.health.cluster.clone());

    let rt = tokio::runtime::Runtime::new()?;
    let (tx, rx) = watch::channel(HealthMap::new());
    let (liveness, _guard) = Liveness::new();

    let outcome = rt
        .block_on(aggregator.refresh(namespaces, &liveness, &tx))
        .with_context(|| format!("Failed to fetch health from {}", settings.health.endpoint))?;
    if let RefreshOutcome::Published(count) = outcome {
        info!(namespaces = count, "Fetched namespace health");
    }

    let rollups = rollup(&rx.borrow());
    let json = serde_json::to_string_pretty(&rollups)?;
    write_or_print(&json, export)
}

#[cfg(not(feature = "http"))]
fn run_health(_settings: &Settings, _export: Option<&Path>) -> Result<()> {
    bail!("Health fetching requires the \"http\" feature")
}

/// Export the view with a summary to a JSON file
fn export_to_file(update: &ViewUpdate, protocols: &[(&str, f64)], export_path: &Path) -> Result<()> {
    let view = &update.view;
    let mut export = serde_json::Map::new();

    let mut summary = serde_json::Map::new();
    summary.insert("nodes".to_string(), serde_json::json!(view.nodes.len()));
    summary.insert("edges".to_string(), serde_json::json!(view.edges.len()));
    summary.insert(
        "animated_edges".to_string(),
        serde_json::json!(view.edges.iter().filter(|e| e.delay_ms.is_some()).count()),
    );
    summary.insert(
        "badged_nodes".to_string(),
        serde_json::json!(view.nodes.iter().filter(|n| !n.decoration.badges.is_empty()).count()),
    );

    let rates: serde_json::Map<String, serde_json::Value> = protocols
        .iter()
        .map(|(name, rate)| (name.to_string(), serde_json::json!(rate)))
        .collect();
    summary.insert("total_rates".to_string(), serde_json::Value::Object(rates));

    export.insert("summary".to_string(), serde_json::Value::Object(summary));
    export.insert("view".to_string(), serde_json::to_value(view)?);

    let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
    write_or_print(&json, Some(export_path))
}

fn write_or_print(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
