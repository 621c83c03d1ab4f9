pub mod errors;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::market_data::MarketDataService;
use crate::infrastructure::candles::KrakenPairDiscovery;

/// Shared handler state: the assembled `MarketDataService` plus the ambient
/// knobs handlers need (scan throttle, default candle count). Cloned per
/// request by axum's `State` extractor — everything inside is `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    pub market_data: Arc<dyn MarketDataService>,
    pub pair_discovery: Option<Arc<KrakenPairDiscovery>>,
    pub scan_throttle: Duration,
    pub default_candle_limit: usize,
}

/// Builds the `axum::Router` for the four analysis endpoints plus the
/// ambient `/healthz` liveness check, with request tracing via
/// `tower_http::TraceLayer` (method, path, status, latency as `info!` spans).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/analyze/:symbol", get(handlers::analyze))
        .route("/api/analyze-full", get(handlers::analyze_full))
        .route("/api/scan", get(handlers::scan))
        .route("/api/symbols", get(handlers::symbols))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
