use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleDirection {
    #[serde(rename = "bull")]
    Bull,
    #[serde(rename = "bear")]
    Bear,
    #[serde(rename = "doji")]
    Doji,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOhlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Anatomy of the last candle in a series. All percentages are of the
/// candle's high-low range; when `range == 0` this is a zeroed doji.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleAnatomy {
    pub direction: CandleDirection,
    pub body_pct: f64,
    pub upper_wick_pct: f64,
    pub lower_wick_pct: f64,
    /// 0 = close at the low of the range, 100 = close at the high.
    pub close_relative_to_range: f64,
    pub close_above_ema21: bool,
    pub close_below_ema21: bool,
    pub raw: RawOhlc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceActionPatterns {
    pub rejection_up: bool,
    pub rejection_down: bool,
    pub engulfing_bull: bool,
    pub engulfing_bear: bool,
    pub inside_bar: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportResistance {
    pub resistance: Option<f64>,
    pub support: Option<f64>,
    pub at_resistance: bool,
    pub at_support: bool,
    pub broke_resistance_on_close: bool,
    pub broke_support_on_close: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureDirection {
    #[serde(rename = "bullish")]
    Bullish,
    #[serde(rename = "bearish")]
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureEventType {
    #[serde(rename = "BOS")]
    Bos,
    #[serde(rename = "CHOCH")]
    Choch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureEvent {
    pub r#type: StructureEventType,
    pub direction: StructureDirection,
    pub from_swing: f64,
    pub to_swing: f64,
    pub price: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentStructure {
    #[serde(rename = "uptrend")]
    Uptrend,
    #[serde(rename = "downtrend")]
    Downtrend,
    #[serde(rename = "flat")]
    Flat,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStructure {
    pub current_structure: Option<CurrentStructure>,
    pub last_bos: Option<StructureEvent>,
    pub last_choch: Option<StructureEvent>,
}

impl Default for MarketStructure {
    /// Too little history to classify structure still reports a value —
    /// `unknown` is the closed enum's "no data" member, never a bare `null`.
    fn default() -> Self {
        Self {
            current_structure: Some(CurrentStructure::Unknown),
            last_bos: None,
            last_choch: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityZoneType {
    #[serde(rename = "equal_highs")]
    EqualHighs,
    #[serde(rename = "equal_lows")]
    EqualLows,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityZone {
    pub r#type: LiquidityZoneType,
    pub price: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairValueGap {
    pub direction: StructureDirection,
    pub top: f64,
    pub bottom: f64,
    pub filled: bool,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivergenceType {
    #[serde(rename = "regular")]
    Regular,
    #[serde(rename = "hidden")]
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivergenceIndicator {
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "StochRSI")]
    StochRsi,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Divergence {
    pub side: StructureDirection,
    pub r#type: DivergenceType,
    pub indicator: DivergenceIndicator,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProfile {
    pub high_volume_nodes: Vec<f64>,
    pub low_volume_nodes: Vec<f64>,
    pub value_area_high: Option<f64>,
    pub value_area_low: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VwapPosition {
    #[serde(rename = "above")]
    Above,
    #[serde(rename = "below")]
    Below,
    #[serde(rename = "at")]
    At,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VwapBlock {
    pub vwap: f64,
    pub position: VwapPosition,
    pub distance_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerBlock {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth_pct: f64,
    pub squeeze: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaStackBlock {
    pub ma21: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub bull_stack: bool,
    pub bear_stack: bool,
    pub flat_stack: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedIndicators {
    pub vwap: Option<VwapBlock>,
    pub bollinger: Option<BollingerBlock>,
    pub ma_stack: Option<MaStackBlock>,
}

/// Structural features layered on candles + indicators + swings. Every field
/// is present even on a short/missing series — defaults are empty
/// collections and `None`, never a thrown error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFeatures {
    pub candle_anatomy: CandleAnatomy,
    pub price_action: PriceActionPatterns,
    pub support_resistance: SupportResistance,
    pub market_structure: MarketStructure,
    pub liquidity_zones: Vec<LiquidityZone>,
    pub fair_value_gaps: Vec<FairValueGap>,
    pub divergences: Vec<Divergence>,
    pub volume_profile: VolumeProfile,
    pub advanced: AdvancedIndicators,
}
