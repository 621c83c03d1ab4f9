use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use rustrade_signals::application::market_data::FallbackMarketDataService;
use rustrade_signals::config::Config;
use rustrade_signals::infrastructure::candles::{static_symbol_table, KrakenCandleProvider, KrakenPairDiscovery, SecondaryCandleProvider, SyntheticCandleProvider};
use rustrade_signals::infrastructure::observability::init_tracing;
use rustrade_signals::interfaces::http::{build_router, AppState};

/// CLI overrides for the environment-driven configuration. Every flag is
/// optional; an omitted flag falls back to the matching environment
/// variable (or its default) in `Config::from_env`.
#[derive(Parser, Debug)]
#[command(name = "rustrade-signals", version, about = "Multi-timeframe crypto signal engine HTTP server")]
struct Cli {
    /// Override the PORT environment variable.
    #[arg(long)]
    port: Option<u16>,
    /// Override the HOST environment variable.
    #[arg(long)]
    host: Option<Ipv4Addr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("rustrade-signals {} starting", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.bind_address.set_port(port);
    }
    if let Some(host) = cli.host {
        config.bind_address.set_ip(IpAddr::V4(host));
    }
    info!(bind = %config.bind_address, primary = %config.primary_base_url, "configuration loaded");

    let market_data = FallbackMarketDataService::builder()
        .provider(Arc::new(KrakenCandleProvider::new(config.primary_base_url.clone(), config.upstream_timeout)))
        .provider(Arc::new(SecondaryCandleProvider::new(config.secondary_base_url.clone(), config.upstream_timeout)))
        .provider(Arc::new(SyntheticCandleProvider::new()))
        .symbols(static_symbol_table())
        .build();

    let state = AppState {
        market_data: Arc::new(market_data),
        pair_discovery: Some(Arc::new(KrakenPairDiscovery::new(config.primary_base_url.clone(), config.upstream_timeout))),
        scan_throttle: config.scan_throttle,
        default_candle_limit: config.default_candle_limit,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!(addr = %config.bind_address, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
