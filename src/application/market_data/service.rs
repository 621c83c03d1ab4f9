use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use crate::domain::errors::UpstreamError;
use crate::domain::market::{Candle, IntervalCode, SymbolInfo, TickerPrice};

use super::aggregation::aggregate_candles;
use super::ports::{CandleProvider, IntervalResults, MarketDataService};

/// Composes the primary -> secondary -> synthetic provider chain and the
/// symbol registry into the single `MarketDataService` the rest of the
/// pipeline depends on. Providers are tried in order; the first one that
/// doesn't error wins. Aggregated intervals (currently only `ThreeDay`) are
/// resolved by recursively fetching their source interval at `limit *
/// chunk_size` and reducing.
pub struct FallbackMarketDataService {
    providers: Vec<Arc<dyn CandleProvider>>,
    symbols: HashMap<String, SymbolInfo>,
}

impl FallbackMarketDataService {
    pub fn builder() -> FallbackMarketDataServiceBuilder {
        FallbackMarketDataServiceBuilder::default()
    }

    async fn fetch_native(&self, pair_id: &str, interval: IntervalCode, limit: usize) -> Result<Vec<Candle>, UpstreamError> {
        for provider in &self.providers {
            match provider.fetch_candles(pair_id, interval, limit).await {
                Ok(candles) if !candles.is_empty() => return Ok(candles),
                Ok(_) => warn!(provider = provider.name(), %pair_id, "empty candle series, trying next source"),
                Err(e) => warn!(provider = provider.name(), %pair_id, error = %e, "candle fetch failed, trying next source"),
            }
        }
        Err(UpstreamError::AllSourcesExhausted { symbol: pair_id.to_string(), interval: interval.as_code().to_string() })
    }

    /// Intervals only ever aggregate one hop deep in this pipeline (3d <- 1d),
    /// so this resolves the source interval directly rather than recursing —
    /// true async-fn recursion would need boxing the whole call chain.
    async fn fetch_with_aggregation(&self, pair_id: &str, interval: IntervalCode, limit: usize) -> Result<Vec<Candle>, UpstreamError> {
        match interval.aggregation_source() {
            None => self.fetch_native(pair_id, interval, limit).await,
            Some((source, chunk)) => {
                let source_candles = self.fetch_native(pair_id, source, limit * chunk).await?;
                Ok(aggregate_candles(&source_candles, chunk))
            }
        }
    }
}

#[derive(Default)]
pub struct FallbackMarketDataServiceBuilder {
    providers: Vec<Arc<dyn CandleProvider>>,
    symbols: Vec<SymbolInfo>,
}

impl FallbackMarketDataServiceBuilder {
    pub fn provider(mut self, provider: Arc<dyn CandleProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn symbols(mut self, symbols: Vec<SymbolInfo>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn build(self) -> FallbackMarketDataService {
        assert!(!self.providers.is_empty(), "at least one candle provider is required");
        info!(providers = self.providers.len(), symbols = self.symbols.len(), "market data service assembled");
        FallbackMarketDataService {
            providers: self.providers,
            symbols: self.symbols.into_iter().map(|s| (s.symbol.clone(), s)).collect(),
        }
    }
}

#[async_trait]
impl MarketDataService for FallbackMarketDataService {
    async fn get_candles(&self, symbol: &str, interval: IntervalCode, limit: usize) -> Result<Vec<Candle>, UpstreamError> {
        let info = self.resolve_symbol(symbol).ok_or_else(|| UpstreamError::AllSourcesExhausted {
            symbol: symbol.to_string(),
            interval: interval.as_code().to_string(),
        })?;
        self.fetch_with_aggregation(&info.pair_id, interval, limit).await
    }

    async fn get_multi_timeframe_data(&self, symbol: &str, intervals: &[IntervalCode], limit: usize) -> IntervalResults {
        let fetches = intervals.iter().map(|interval| async move { (*interval, self.get_candles(symbol, *interval, limit).await) });
        join_all(fetches).await
    }

    async fn get_ticker_price(&self, symbol: &str) -> Result<TickerPrice, UpstreamError> {
        let Some(info) = self.resolve_symbol(symbol) else {
            return Err(UpstreamError::AllSourcesExhausted { symbol: symbol.to_string(), interval: "ticker".to_string() });
        };
        for provider in &self.providers {
            match provider.fetch_ticker(&info.pair_id).await {
                Ok(ticker) => return Ok(ticker),
                Err(e) => warn!(provider = provider.name(), %symbol, error = %e, "ticker fetch failed, trying next source"),
            }
        }
        Err(UpstreamError::AllSourcesExhausted { symbol: symbol.to_string(), interval: "ticker".to_string() })
    }

    fn get_all_pairs(&self) -> Vec<SymbolInfo> {
        self.symbols.values().cloned().collect()
    }

    fn resolve_symbol(&self, symbol: &str) -> Option<SymbolInfo> {
        self.symbols.get(symbol).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyProvider {
        fails: AtomicUsize,
    }

    #[async_trait]
    impl CandleProvider for FlakyProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn fetch_candles(&self, _pair_id: &str, _interval: IntervalCode, _limit: usize) -> anyhow::Result<Vec<Candle>> {
            self.fails.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("simulated failure"))
        }

        async fn fetch_ticker(&self, _pair_id: &str) -> anyhow::Result<TickerPrice> {
            Err(anyhow::anyhow!("simulated failure"))
        }
    }

    struct StaticProvider;

    #[async_trait]
    impl CandleProvider for StaticProvider {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch_candles(&self, _pair_id: &str, _interval: IntervalCode, limit: usize) -> anyhow::Result<Vec<Candle>> {
            Ok((0..limit as i64).map(|i| Candle::new(i, 1.0, 1.0, 1.0, 1.0, 1.0)).collect())
        }

        async fn fetch_ticker(&self, _pair_id: &str) -> anyhow::Result<TickerPrice> {
            Ok(TickerPrice { price: 1.0, price_change_percent: 0.0 })
        }
    }

    fn symbol() -> SymbolInfo {
        SymbolInfo { symbol: "BTCUSD".to_string(), name: "Bitcoin".to_string(), pair_id: "XBTUSD".to_string(), base: "BTC".to_string(), quote: "USD".to_string() }
    }

    #[tokio::test]
    async fn falls_back_to_next_provider_on_failure() {
        let service = FallbackMarketDataService::builder()
            .provider(Arc::new(FlakyProvider { fails: AtomicUsize::new(0) }))
            .provider(Arc::new(StaticProvider))
            .symbols(vec![symbol()])
            .build();

        let candles = service.get_candles("BTCUSD", IntervalCode::OneHour, 10).await.unwrap();
        assert_eq!(candles.len(), 10);
    }

    #[tokio::test]
    async fn unknown_symbol_errs() {
        let service = FallbackMarketDataService::builder().provider(Arc::new(StaticProvider)).symbols(vec![symbol()]).build();
        assert!(service.get_candles("DOGEUSD", IntervalCode::OneHour, 10).await.is_err());
    }

    #[tokio::test]
    async fn three_day_aggregates_from_one_day() {
        let service = FallbackMarketDataService::builder().provider(Arc::new(StaticProvider)).symbols(vec![symbol()]).build();
        let candles = service.get_candles("BTCUSD", IntervalCode::ThreeDay, 5).await.unwrap();
        assert_eq!(candles.len(), 5);
    }

    #[tokio::test]
    async fn multi_timeframe_preserves_requested_order() {
        let service = FallbackMarketDataService::builder().provider(Arc::new(StaticProvider)).symbols(vec![symbol()]).build();
        let intervals = [IntervalCode::FourHour, IntervalCode::OneHour, IntervalCode::FifteenMin];
        let results = service.get_multi_timeframe_data("BTCUSD", &intervals, 10).await;
        let ordered: Vec<IntervalCode> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(ordered, intervals);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
    }
}
