use serde::{Deserialize, Serialize};

/// One row of the internal symbol -> upstream pair table.
/// `pair_id` is whatever the upstream source needs to identify the market
/// (a Kraken altname, a Binance symbol, etc.) — opaque to everything above
/// `infrastructure::candles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
    pub pair_id: String,
    pub base: String,
    pub quote: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerPrice {
    pub price: f64,
    pub price_change_percent: f64,
}
