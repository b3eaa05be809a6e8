use std::error::Error;
use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_router::dataset;
use transit_router::planner::{Network, Planner, PlannerConfig};
use transit_router::web::{AppState, create_router};

/// Directory holding `stops.csv`, `lines.csv` and the line files.
const DEFAULT_DATASET_DIR: &str = "dataset";

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dataset_dir =
        std::env::var("ROUTER_DATASET_DIR").unwrap_or_else(|_| DEFAULT_DATASET_DIR.to_string());
    let addr: SocketAddr = std::env::var("ROUTER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    // Load the dataset and build both service graphs (fail fast if unavailable)
    let dataset = dataset::load(&dataset_dir)?;
    let network = Network::from_dataset(&dataset)?;
    let planner = Planner::new(network, PlannerConfig::default());

    let state = AppState::new(planner);
    info!(stops = state.stops.len(), "Stop directory ready");
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Transit router listening");
    info!("  GET  /health      - Health check");
    info!("  GET  /api/stops   - Search stops by code or name");
    info!("  POST /api/route   - Plan a route");

    axum::serve(listener, app).await?;
    Ok(())
}
