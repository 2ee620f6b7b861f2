//! Thin axum bootstrap for the JSON facade (spec.md §1 "external
//! collaborators"; SPEC_FULL.md §1 "a thin HTTP facade... behind the `web`
//! Cargo feature"). Deliberately as bare as the teacher's own `main.rs`: a
//! dataset load, one `AppState`, one `axum::serve` call.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use rail_engine::dataset;
use rail_engine::network::Network;
use rail_engine::query::SystemClock;
use rail_engine::router::SearchConfig;
use rail_engine::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let dataset_dir: PathBuf = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RAIL_ENGINE_DATASET").ok())
        .expect("usage: rail-engine-server <dataset-dir>")
        .into();

    let files = dataset::discover(&dataset_dir).expect("failed to read dataset directory");

    let mut specs = Vec::new();
    for (path, result) in dataset::load_all(files).await {
        match result {
            Ok((spec, _warnings)) => specs.push(spec),
            Err(err) => tracing::warn!(path = %path.display(), %err, "rejected line document"),
        }
    }

    let (network, report) = Network::build(specs).expect("dataset contains zero valid lines");

    let state = AppState::new(network, report, SearchConfig::default(), Arc::new(SystemClock));
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
