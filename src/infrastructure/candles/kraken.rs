use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::warn;

use crate::application::market_data::CandleProvider;
use crate::domain::market::{Candle, IntervalCode, TickerPrice};
use crate::infrastructure::core::{build_client, CircuitBreaker, UpstreamTier};

/// Primary candle source, shaped after Kraken's public `/0/public/OHLC` and
/// `/0/public/Ticker` endpoints. Kraken's OHLC rows are
/// `[time, open, high, low, close, vwap, volume, count]` with numeric fields
/// as strings — handled by serde's untagged numeric-or-string coercion.
pub struct KrakenCandleProvider {
    client: ClientWithMiddleware,
    base_url: String,
    timeout: Duration,
    circuit_breaker: CircuitBreaker,
}

impl KrakenCandleProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.into(),
            timeout,
            circuit_breaker: CircuitBreaker::new("kraken", UpstreamTier::Primary, 5, 2, Duration::from_secs(30)),
        }
    }
}

#[derive(Deserialize)]
struct KrakenOhlcResponse {
    error: Vec<String>,
    result: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Deserialize)]
struct KrakenTickerResponse {
    error: Vec<String>,
    result: Option<HashMap<String, KrakenTickerPair>>,
}

#[derive(Deserialize)]
struct KrakenTickerPair {
    /// `c` = last trade closed `[price, lot volume]`.
    c: (String, String),
    /// `o` = today's opening price.
    o: String,
}

#[async_trait]
impl CandleProvider for KrakenCandleProvider {
    fn name(&self) -> &'static str {
        "kraken"
    }

    async fn fetch_candles(&self, pair_id: &str, interval: IntervalCode, limit: usize) -> Result<Vec<Candle>> {
        let url = format!("{}/0/public/OHLC", self.base_url);
        let pair_id = pair_id.to_string();
        let minutes = interval.to_minutes().to_string();

        let fut = self
            .client
            .get(&url)
            .query(&[("pair", pair_id.as_str()), ("interval", minutes.as_str())])
            .send();

        let response = self
            .circuit_breaker
            .call_upstream(&pair_id, interval.as_code(), self.timeout, async { fut.await.context("Kraken OHLC request failed") })
            .await?;

        let body: KrakenOhlcResponse = response.json().await.context("Failed to parse Kraken OHLC response")?;
        if !body.error.is_empty() {
            return Err(anyhow!("Kraken OHLC error: {}", body.error.join(", ")));
        }
        let result = body.result.ok_or_else(|| anyhow!("Kraken OHLC response missing result"))?;
        let rows = result
            .into_iter()
            .find(|(key, _)| key != "last")
            .map(|(_, v)| v)
            .ok_or_else(|| anyhow!("Kraken OHLC response had no pair data for {pair_id}"))?;

        let mut candles = parse_kraken_rows(&rows)?;
        if candles.len() > limit {
            candles = candles.split_off(candles.len() - limit);
        }
        Ok(candles)
    }

    async fn fetch_ticker(&self, pair_id: &str) -> Result<TickerPrice> {
        let url = format!("{}/0/public/Ticker", self.base_url);
        let pair_id_owned = pair_id.to_string();
        let fut = self.client.get(&url).query(&[("pair", pair_id_owned.as_str())]).send();

        let response = self
            .circuit_breaker
            .call_upstream(&pair_id_owned, "ticker", self.timeout, async { fut.await.context("Kraken ticker request failed") })
            .await?;

        let body: KrakenTickerResponse = response.json().await.context("Failed to parse Kraken ticker response")?;
        if !body.error.is_empty() {
            return Err(anyhow!("Kraken ticker error: {}", body.error.join(", ")));
        }
        let result = body.result.ok_or_else(|| anyhow!("Kraken ticker response missing result"))?;
        let pair = result.into_values().next().ok_or_else(|| anyhow!("Kraken ticker response had no pair data"))?;

        let last: f64 = pair.c.0.parse().context("Failed to parse Kraken last price")?;
        let open: f64 = pair.o.parse().context("Failed to parse Kraken open price")?;
        let price_change_percent = if open != 0.0 { (last - open) / open * 100.0 } else { 0.0 };

        Ok(TickerPrice { price: last, price_change_percent })
    }
}

fn parse_kraken_rows(rows: &serde_json::Value) -> Result<Vec<Candle>> {
    let array = rows.as_array().ok_or_else(|| anyhow!("Kraken OHLC rows were not an array"))?;
    let mut candles = Vec::with_capacity(array.len());
    for row in array {
        let parsed = parse_kraken_row(row);
        match parsed {
            Some(candle) => candles.push(candle),
            None => warn!(?row, "skipping malformed Kraken OHLC row"),
        }
    }
    Ok(candles)
}

fn parse_kraken_row(row: &serde_json::Value) -> Option<Candle> {
    let cols = row.as_array()?;
    let time = cols.first()?.as_i64()?;
    let open: f64 = cols.get(1)?.as_str()?.parse().ok()?;
    let high: f64 = cols.get(2)?.as_str()?.parse().ok()?;
    let low: f64 = cols.get(3)?.as_str()?.parse().ok()?;
    let close: f64 = cols.get(4)?.as_str()?.parse().ok()?;
    let volume: f64 = cols.get(6)?.as_str()?.parse().ok()?;
    Some(Candle::new(time * 1000, open, high, low, close, volume))
}
