//! shipmap-api — HTTP surface for the traffic map.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET, POST | `/log/complete/{id}` | Count a successful connection |
//! | GET, POST | `/log/failed/{id}` | Count a failed connection |
//! | GET | `/get` | Topology with published metrics (JSON) |
//! | GET | anything else | Static visualization assets |

pub mod handlers;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{MethodFilter, get, on};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use shipmap_metrics::TrafficMap;

/// Shared state for handlers.
#[derive(Clone)]
pub struct ApiState {
    pub map: Arc<TrafficMap>,
}

/// Build the complete router. Paths without a route are served from
/// `static_dir`.
pub fn build_router(map: Arc<TrafficMap>, static_dir: &Path) -> Router {
    let state = ApiState { map };
    let ingest = MethodFilter::GET.or(MethodFilter::POST);

    Router::new()
        .route("/log/complete/", on(ingest, handlers::missing_connection))
        .route("/log/complete/{*id}", on(ingest, handlers::log_completed))
        .route("/log/failed/", on(ingest, handlers::missing_connection))
        .route("/log/failed/{*id}", on(ingest, handlers::log_failed))
        .route("/get", get(handlers::get_topology))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
