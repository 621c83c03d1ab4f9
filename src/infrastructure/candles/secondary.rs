use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::warn;

use crate::application::market_data::CandleProvider;
use crate::domain::market::{Candle, IntervalCode, TickerPrice};
use crate::infrastructure::core::{build_client, CircuitBreaker, UpstreamTier};

/// Secondary fallback, shaped after Binance's public `/api/v3/klines` and
/// `/api/v3/ticker/24hr` endpoints — tried only when the primary source
/// fails. Klines rows are `[openTime, open, high, low, close, volume, ...]`
/// with numeric fields as strings.
pub struct SecondaryCandleProvider {
    client: ClientWithMiddleware,
    base_url: String,
    timeout: Duration,
    circuit_breaker: CircuitBreaker,
}

impl SecondaryCandleProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.into(),
            timeout,
            circuit_breaker: CircuitBreaker::new("secondary", UpstreamTier::Secondary, 5, 2, Duration::from_secs(30)),
        }
    }

    fn binance_interval(interval: IntervalCode) -> &'static str {
        match interval {
            IntervalCode::OneMin => "1m",
            IntervalCode::ThreeMin => "3m",
            IntervalCode::FiveMin => "5m",
            IntervalCode::FifteenMin => "15m",
            IntervalCode::ThirtyMin => "30m",
            IntervalCode::OneHour => "1h",
            IntervalCode::FourHour => "4h",
            IntervalCode::OneDay | IntervalCode::ThreeDay => "1d",
            IntervalCode::OneWeek => "1w",
            IntervalCode::OneMonth => "1M",
        }
    }
}

#[derive(Deserialize)]
struct Ticker24h {
    #[serde(rename = "lastPrice")]
    last_price: String,
    #[serde(rename = "priceChangePercent")]
    price_change_percent: String,
}

#[async_trait]
impl CandleProvider for SecondaryCandleProvider {
    fn name(&self) -> &'static str {
        "secondary"
    }

    async fn fetch_candles(&self, pair_id: &str, interval: IntervalCode, limit: usize) -> Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit_str = limit.min(1000).to_string();
        let fut = self
            .client
            .get(&url)
            .query(&[("symbol", pair_id), ("interval", Self::binance_interval(interval)), ("limit", &limit_str)])
            .send();

        let response = self
            .circuit_breaker
            .call_upstream(pair_id, interval.as_code(), self.timeout, async { fut.await.context("secondary klines request failed") })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("secondary klines fetch failed ({status}): {body}"));
        }

        let rows: Vec<serde_json::Value> = response.json().await.context("failed to parse secondary klines response")?;
        let mut candles = Vec::with_capacity(rows.len());
        for row in &rows {
            match parse_kline_row(row) {
                Some(candle) => candles.push(candle),
                None => warn!(?row, "skipping malformed secondary kline row"),
            }
        }
        Ok(candles)
    }

    async fn fetch_ticker(&self, pair_id: &str) -> Result<TickerPrice> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);
        let fut = self.client.get(&url).query(&[("symbol", pair_id)]).send();

        let response = self
            .circuit_breaker
            .call_upstream(pair_id, "ticker", self.timeout, async { fut.await.context("secondary ticker request failed") })
            .await?;

        let body: Ticker24h = response.json().await.context("failed to parse secondary ticker response")?;
        Ok(TickerPrice {
            price: body.last_price.parse().context("failed to parse secondary last price")?,
            price_change_percent: body.price_change_percent.parse().context("failed to parse secondary price change")?,
        })
    }
}

fn parse_kline_row(row: &serde_json::Value) -> Option<Candle> {
    let cols = row.as_array()?;
    let time = cols.first()?.as_i64()?;
    let open: f64 = cols.get(1)?.as_str()?.parse().ok()?;
    let high: f64 = cols.get(2)?.as_str()?.parse().ok()?;
    let low: f64 = cols.get(3)?.as_str()?.parse().ok()?;
    let close: f64 = cols.get(4)?.as_str()?.parse().ok()?;
    let volume: f64 = cols.get(5)?.as_str()?.parse().ok()?;
    Some(Candle::new(time, open, high, low, close, volume))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kline_row() {
        let row = serde_json::json!([1700000000000i64, "100.0", "110.0", "95.0", "105.0", "42.5", 1700000060000i64]);
        let candle = parse_kline_row(&row).unwrap();
        assert_eq!(candle.close, 105.0);
        assert_eq!(candle.volume, 42.5);
    }

    #[test]
    fn maps_three_day_to_one_day_bars() {
        assert_eq!(SecondaryCandleProvider::binance_interval(IntervalCode::ThreeDay), "1d");
    }
}
