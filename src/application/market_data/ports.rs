use async_trait::async_trait;

use crate::domain::errors::UpstreamError;
use crate::domain::market::{Candle, IntervalCode, SymbolInfo, TickerPrice};

/// A source of candle/ticker data for one upstream pair. Implemented once
/// per fallback tier (`infrastructure::candles::{kraken, secondary, synthetic}`);
/// the synthetic tier never returns `Err`, which is what gives
/// `get_candles` its "never returns an empty success" guarantee.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_candles(&self, pair_id: &str, interval: IntervalCode, limit: usize) -> anyhow::Result<Vec<Candle>>;

    async fn fetch_ticker(&self, pair_id: &str) -> anyhow::Result<TickerPrice>;
}

/// Per-interval results from a multi-timeframe fetch, in the order the
/// caller requested the intervals.
pub type IntervalResults = Vec<(IntervalCode, Result<Vec<Candle>, UpstreamError>)>;

/// Standardized candle arrays keyed by
/// interval for a requested symbol, with interval aggregation and
/// per-interval fail-soft semantics baked in.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    async fn get_candles(&self, symbol: &str, interval: IntervalCode, limit: usize) -> Result<Vec<Candle>, UpstreamError>;

    async fn get_multi_timeframe_data(&self, symbol: &str, intervals: &[IntervalCode], limit: usize) -> IntervalResults;

    async fn get_ticker_price(&self, symbol: &str) -> Result<TickerPrice, UpstreamError>;

    fn get_all_pairs(&self) -> Vec<SymbolInfo>;

    fn resolve_symbol(&self, symbol: &str) -> Option<SymbolInfo>;
}
