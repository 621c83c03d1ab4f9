//! Drives the assembled `axum::Router` in-process via `tower::Service::call`,
//! exercising the four endpoints end-to-end with the deterministic synthetic
//! candle source so no real network access is required.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use rustrade_signals::application::market_data::FallbackMarketDataService;
use rustrade_signals::infrastructure::candles::{static_symbol_table, SyntheticCandleProvider};
use rustrade_signals::interfaces::http::{build_router, AppState};

fn test_state() -> AppState {
    let market_data = FallbackMarketDataService::builder().provider(Arc::new(SyntheticCandleProvider::new())).symbols(static_symbol_table()).build();

    AppState {
        market_data: Arc::new(market_data),
        pair_discovery: None,
        scan_throttle: Duration::from_millis(1),
        default_candle_limit: 210,
    }
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = build_router(test_state());
    let response = app.oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analyze_unknown_symbol_is_bad_request() {
    let app = build_router(test_state());
    let response = app.oneshot(Request::builder().uri("/api/analyze/NOPEUSD").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_known_symbol_succeeds_with_synthetic_data() {
    let app = build_router(test_state());
    let response = app.oneshot(Request::builder().uri("/api/analyze/BTCUSD?mode=STANDARD").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analyze_rejects_invalid_mode() {
    let app = build_router(test_state());
    let response = app.oneshot(Request::builder().uri("/api/analyze/BTCUSD?mode=YOLO").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_full_returns_rich_symbol_shape() {
    let app = build_router(test_state());
    let response = app.oneshot(Request::builder().uri("/api/analyze-full?symbol=ETHUSD&mode=AGGRESSIVE").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn symbols_endpoint_lists_the_static_table() {
    let app = build_router(test_state());
    let response = app.oneshot(Request::builder().uri("/api/symbols").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn scan_endpoint_completes_over_the_default_symbol_slice() {
    let app = build_router(test_state());
    let response = app.oneshot(Request::builder().uri("/api/scan?mode=STANDARD&maxResults=3").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn scan_rejects_invalid_direction_filter() {
    let app = build_router(test_state());
    let response = app.oneshot(Request::builder().uri("/api/scan?direction=sideways").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
