//! Wires `MarketDataService` output into `TimeframeAnalysis` records and
//! assembles the router/aggregator inputs the HTTP handlers need. This is
//! the only place that treats a per-interval `UpstreamError` as anything
//! other than a hard failure: it degrades to an empty candle series, which
//! `build_timeframe_analysis` already turns into a structurally-complete,
//! all-null/zeroed record, so every downstream consumer sees
//! a normal `TimeframeAnalysis` and "skips gracefully" by virtue of every
//! gate simply failing to pass rather than needing a distinct error branch.
use std::sync::Arc;

use tracing::warn;

use crate::application::htf_bias::compute_htf_bias;
use crate::application::market_data::MarketDataService;
use crate::application::timeframe_analysis::build_timeframe_analysis;
use crate::domain::errors::InputError;
use crate::domain::market::{Candle, IntervalCode};
use crate::domain::signal::{HtfBias, TimeframeMap};

/// Fetches and builds the composite per-interval analysis for one symbol,
/// preserving the caller's requested interval order.
pub async fn build_timeframe_map(
    market_data: &Arc<dyn MarketDataService>,
    symbol: &str,
    intervals: &[IntervalCode],
    limit: usize,
) -> Result<TimeframeMap, InputError> {
    if market_data.resolve_symbol(symbol).is_none() {
        return Err(InputError::UnknownSymbol { symbol: symbol.to_string() });
    }

    let results = market_data.get_multi_timeframe_data(symbol, intervals, limit).await;
    let mut map = TimeframeMap::default();
    for (interval, result) in results {
        let candles: Vec<Candle> = match result {
            Ok(candles) => candles,
            Err(e) => {
                warn!(%symbol, interval = interval.as_code(), error = %e, "interval fetch failed, degrading to empty series");
                Vec::new()
            }
        };
        map.push(interval, build_timeframe_analysis(&candles, interval));
    }
    Ok(map)
}

/// HTF bias is always derived from 4h/1h, whichever of those two the caller
/// happened to request (or `None` if they weren't requested at all).
pub fn htf_bias_for(timeframes: &TimeframeMap) -> HtfBias {
    compute_htf_bias(timeframes.get(IntervalCode::FourHour), timeframes.get(IntervalCode::OneHour))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::market_data::FallbackMarketDataService;
    use crate::domain::market::{SymbolInfo, TickerPrice};
    use async_trait::async_trait;

    struct AlwaysFails;

    #[async_trait]
    impl crate::application::market_data::CandleProvider for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }
        async fn fetch_candles(&self, _pair_id: &str, _interval: IntervalCode, _limit: usize) -> anyhow::Result<Vec<Candle>> {
            Err(anyhow::anyhow!("down"))
        }
        async fn fetch_ticker(&self, _pair_id: &str) -> anyhow::Result<TickerPrice> {
            Err(anyhow::anyhow!("down"))
        }
    }

    #[tokio::test]
    async fn unknown_symbol_is_rejected_before_fetching() {
        let service: Arc<dyn MarketDataService> =
            Arc::new(FallbackMarketDataService::builder().provider(Arc::new(AlwaysFails)).symbols(vec![]).build());
        let result = build_timeframe_map(&service, "NOPEUSD", &[IntervalCode::OneHour], 10).await;
        assert!(matches!(result, Err(InputError::UnknownSymbol { .. })));
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_empty_but_present_analysis() {
        let symbol = SymbolInfo { symbol: "BTCUSD".into(), name: "Bitcoin".into(), pair_id: "XBTUSD".into(), base: "BTC".into(), quote: "USD".into() };
        let service: Arc<dyn MarketDataService> =
            Arc::new(FallbackMarketDataService::builder().provider(Arc::new(AlwaysFails)).symbols(vec![symbol]).build());
        let map = build_timeframe_map(&service, "BTCUSD", &[IntervalCode::OneHour], 10).await.unwrap();
        let analysis = map.get(IntervalCode::OneHour).unwrap();
        assert_eq!(analysis.candle_count, 0);
    }
}
