use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Uptrend,
    Downtrend,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullbackState {
    #[serde(rename = "ENTRY_ZONE")]
    EntryZone,
    #[serde(rename = "RETRACING")]
    Retracing,
    #[serde(rename = "OVEREXTENDED")]
    Overextended,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StochCondition {
    #[serde(rename = "OVERSOLD")]
    Oversold,
    #[serde(rename = "OVERBOUGHT")]
    Overbought,
    #[serde(rename = "BULLISH")]
    Bullish,
    #[serde(rename = "BEARISH")]
    Bearish,
    #[serde(rename = "NEUTRAL")]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrengthCategory {
    #[serde(rename = "VERY_STRONG")]
    VeryStrong,
    #[serde(rename = "STRONG")]
    Strong,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "WEAK")]
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBlock {
    pub current: f64,
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmaBlock {
    pub ema21: Option<f64>,
    pub ema200: Option<f64>,
    pub ema21_history: Vec<f64>,
    pub ema200_history: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StochRsiBlock {
    pub k: f64,
    pub d: f64,
    pub condition: StochCondition,
}

impl StochRsiBlock {
    pub fn with_history(self, history: Vec<f64>) -> StochRsiWithHistory {
        StochRsiWithHistory {
            k: self.k,
            d: self.d,
            condition: self.condition,
            history,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StochRsiWithHistory {
    pub k: f64,
    pub d: f64,
    pub condition: StochCondition,
    pub history: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsiBlock {
    pub value: f64,
    pub history: Vec<f64>,
    pub overbought: bool,
    pub oversold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBlock {
    pub trend: Trend,
    pub pullback_state: PullbackState,
    /// Signed percent: (price - ema21) / ema21 * 100.
    pub distance_from21_ema: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStrengthBlock {
    pub adx: f64,
    pub strong: bool,
    pub weak: bool,
    pub very_strong: bool,
    pub category: TrendStrengthCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlestickPatterns {
    pub bullish_engulfing: bool,
    pub bearish_engulfing: bool,
    pub doji: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WickAnalysis {
    pub rejection: bool,
    pub bullish_rejection: bool,
    pub bearish_rejection: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub candle_count: usize,
    pub last_update: i64,
}

/// Uniform indicator record. Any slot may be `None` when the series is too
/// short to compute it; the parent record is always fully present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub price: PriceBlock,
    pub ema: EmaBlock,
    #[serde(rename = "stochRSI")]
    pub stoch_rsi: StochRsiWithHistory,
    pub rsi: Option<RsiBlock>,
    pub analysis: AnalysisBlock,
    pub trend_strength: Option<TrendStrengthBlock>,
    pub candlestick_patterns: CandlestickPatterns,
    pub wick_analysis: WickAnalysis,
    pub metadata: Metadata,
}
