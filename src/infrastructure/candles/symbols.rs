use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use crate::domain::market::SymbolInfo;
use crate::infrastructure::core::build_client;

/// The curated `{internalSymbol -> {upstreamPairId, metadata}}` table.
/// Read-only process state, built once at startup and handed to
/// `FallbackMarketDataService::builder().symbols(..)`.
pub fn static_symbol_table() -> Vec<SymbolInfo> {
    [
        ("BTCUSD", "Bitcoin", "XXBTZUSD", "BTC"),
        ("ETHUSD", "Ethereum", "XETHZUSD", "ETH"),
        ("SOLUSD", "Solana", "SOLUSD", "SOL"),
        ("XRPUSD", "XRP", "XXRPZUSD", "XRP"),
        ("ADAUSD", "Cardano", "ADAUSD", "ADA"),
        ("DOGEUSD", "Dogecoin", "XDGUSD", "DOGE"),
        ("LTCUSD", "Litecoin", "XLTCZUSD", "LTC"),
        ("LINKUSD", "Chainlink", "LINKUSD", "LINK"),
        ("AVAXUSD", "Avalanche", "AVAXUSD", "AVAX"),
        ("MATICUSD", "Polygon", "MATICUSD", "MATIC"),
    ]
    .into_iter()
    .map(|(symbol, name, pair_id, base)| SymbolInfo {
        symbol: symbol.to_string(),
        name: name.to_string(),
        pair_id: pair_id.to_string(),
        base: base.to_string(),
        quote: "USD".to_string(),
    })
    .collect()
}

/// Dynamic discovery via Kraken's public `/0/public/AssetPairs`, filtered
/// to USD-quoted pairs only. Kept separate
/// from `static_symbol_table` — discovery feeds `/api/symbols?all=true`,
/// while the static table is what the strategy pipeline actually resolves
/// against.
pub struct KrakenPairDiscovery {
    client: ClientWithMiddleware,
    base_url: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct AssetPairsResponse {
    error: Vec<String>,
    result: Option<HashMap<String, AssetPairEntry>>,
}

#[derive(Deserialize)]
struct AssetPairEntry {
    altname: String,
    base: String,
    quote: String,
}

impl KrakenPairDiscovery {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { client: build_client(), base_url: base_url.into(), timeout }
    }

    pub async fn discover(&self) -> Result<Vec<SymbolInfo>> {
        let url = format!("{}/0/public/AssetPairs", self.base_url);
        let response = tokio::time::timeout(self.timeout, self.client.get(&url).send())
            .await
            .context("Kraken AssetPairs request timed out")??;

        let body: AssetPairsResponse = response.json().await.context("Failed to parse Kraken AssetPairs response")?;
        if !body.error.is_empty() {
            return Err(anyhow!("Kraken AssetPairs error: {}", body.error.join(", ")));
        }
        let result = body.result.ok_or_else(|| anyhow!("Kraken AssetPairs response missing result"))?;

        let mut pairs: Vec<SymbolInfo> = result
            .into_values()
            .filter(|entry| is_usd_quote(&entry.quote))
            .map(|entry| SymbolInfo {
                symbol: format!("{}USD", normalize_asset(&entry.base)),
                name: normalize_asset(&entry.base),
                pair_id: entry.altname,
                base: normalize_asset(&entry.base),
                quote: "USD".to_string(),
            })
            .collect();

        pairs.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        pairs.dedup_by(|a, b| a.symbol == b.symbol);
        Ok(pairs)
    }
}

fn is_usd_quote(quote: &str) -> bool {
    matches!(quote, "ZUSD" | "USD" | "USDT")
}

/// Kraken prefixes some legacy assets with `X`/`Z` (`XXBT`, `ZUSD`); strip it
/// for a human-friendly base asset code.
fn normalize_asset(asset: &str) -> String {
    if asset.len() == 4 && (asset.starts_with('X') || asset.starts_with('Z')) {
        asset[1..].to_string()
    } else {
        asset.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_legacy_asset_prefixes() {
        assert_eq!(normalize_asset("XXBT"), "XBT");
        assert_eq!(normalize_asset("SOL"), "SOL");
    }

    #[test]
    fn static_table_is_all_usd_quoted() {
        assert!(static_symbol_table().iter().all(|s| s.quote == "USD"));
    }
}
