use crate::domain::chart_features::{ChartFeatures, Divergence, FairValueGap, LiquidityZone, MarketStructure, VolumeProfile};
use crate::domain::indicators::Indicators;
use crate::domain::market::{Candle, IntervalCode, SwingPoints};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityState {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "extreme")]
    Extreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volatility {
    pub atr: f64,
    pub atr_pct_of_price: f64,
    pub state: VolatilityState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeDirection {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "neutral")]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSummary {
    pub current: f64,
    pub avg20: f64,
    pub trend: VolumeDirection,
}

/// Per-interval composite: indicators + structural features + bookkeeping.
/// Every field in this struct is present even when the candle series was too
/// short, or the upstream source failed — defaults take the place of a
/// thrown error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeAnalysis {
    pub indicators: Indicators,
    pub structure: SwingPoints,
    pub candle_count: usize,
    pub last_candle: Candle,
    pub market_structure: MarketStructure,
    pub volatility: Volatility,
    pub volume: Option<VolumeSummary>,
    pub volume_profile: VolumeProfile,
    pub liquidity_zones: Vec<LiquidityZone>,
    pub fair_value_gaps: Vec<FairValueGap>,
    pub divergences: Vec<Divergence>,
    /// Anatomy / price-action / support-resistance / advanced indicators —
    /// additive detail beyond the canonical top-level fields above.
    pub chart_features: ChartFeatures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasDirection {
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "neutral")]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasSource {
    #[serde(rename = "4h")]
    FourHour,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "none")]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtfBias {
    pub direction: BiasDirection,
    pub confidence: u8,
    pub source: BiasSource,
}

impl Default for HtfBias {
    fn default() -> Self {
        Self {
            direction: BiasDirection::Neutral,
            confidence: 0,
            source: BiasSource::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "SAFE")]
    Safe,
    #[serde(rename = "AGGRESSIVE")]
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "NO_TRADE")]
    NoTrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupType {
    Swing,
    #[serde(rename = "4h")]
    FourHour,
    Scalp,
    MicroScalp,
    #[serde(rename = "auto")]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum SelectedStrategy {
    #[serde(rename = "SWING")]
    Swing,
    #[serde(rename = "TREND_4H")]
    Trend4h,
    #[serde(rename = "SCALP_1H")]
    Scalp1h,
    #[serde(rename = "MICRO_SCALP")]
    MicroScalp,
    #[serde(rename = "TREND_RIDER")]
    TrendRider,
    #[serde(rename = "NO_TRADE")]
    NoTrade,
}

impl SelectedStrategy {
    pub fn human_name(&self) -> &'static str {
        match self {
            SelectedStrategy::Swing => "Swing",
            SelectedStrategy::Trend4h => "4H Trend",
            SelectedStrategy::Scalp1h => "1H Scalp",
            SelectedStrategy::MicroScalp => "Micro Scalp",
            SelectedStrategy::TrendRider => "Trend Rider",
            SelectedStrategy::NoTrade => "No Trade",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryZone {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReward {
    pub tp1_rr: f64,
    pub tp2_rr: Option<f64>,
    pub tp3_rr: Option<f64>,
}

impl RiskReward {
    pub fn none() -> Self {
        Self {
            tp1_rr: 0.0,
            tp2_rr: None,
            tp3_rr: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confluence {
    pub htf_confirmation: bool,
    pub liquidity_zone_score: f64,
    pub fvg_score: f64,
    pub divergence_score: f64,
}

/// Canonical trade signal. Every evaluator result passes through
/// `SignalNormalizer` before leaving the strategy engine, so this shape is
/// identical whether `valid` or not, and across SAFE/AGGRESSIVE modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub valid: bool,
    pub direction: Direction,
    pub setup_type: SetupType,
    pub selected_strategy: SelectedStrategy,
    pub strategies_checked: Vec<SelectedStrategy>,
    pub confidence: u8,
    pub entry_zone: Option<EntryZone>,
    pub stop_loss: Option<f64>,
    pub invalidation_level: Option<f64>,
    pub targets: Vec<f64>,
    pub risk_reward: RiskReward,
    pub reason_summary: String,
    pub confluence: Confluence,
    pub conditions_required: Vec<String>,
    pub htf_bias: HtfBias,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanDirectionFilter {
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "short")]
    Short,
}

/// Insertion-ordered interval -> analysis map. `Vec<(K, V)>` would serialize
/// as an array of pairs; this preserves the requested-interval ordering
/// while still emitting a JSON object keyed by interval code: `{<interval>:
/// TimeframeAnalysis}`.
#[derive(Debug, Clone, Default)]
pub struct TimeframeMap(pub Vec<(IntervalCode, TimeframeAnalysis)>);

impl TimeframeMap {
    pub fn get(&self, interval: IntervalCode) -> Option<&TimeframeAnalysis> {
        self.0.iter().find(|(i, _)| *i == interval).map(|(_, a)| a)
    }

    pub fn push(&mut self, interval: IntervalCode, analysis: TimeframeAnalysis) {
        self.0.push((interval, analysis));
    }
}

impl Serialize for TimeframeMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (interval, analysis) in &self.0 {
            map.serialize_entry(interval.as_code(), analysis)?;
        }
        map.end()
    }
}

/// One slot per evaluator. Modeled as an explicit struct rather than a
/// dynamic map — each evaluator's slot is always present in the response,
/// and a struct makes that a compile-time guarantee instead of a convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StrategySignals {
    pub swing: Signal,
    pub trend_4h: Signal,
    pub scalp_1h: Signal,
    pub micro_scalp: Signal,
    pub trend_rider: Signal,
}

impl StrategySignals {
    pub fn get(&self, strategy: SelectedStrategy) -> Option<&Signal> {
        match strategy {
            SelectedStrategy::Swing => Some(&self.swing),
            SelectedStrategy::Trend4h => Some(&self.trend_4h),
            SelectedStrategy::Scalp1h => Some(&self.scalp_1h),
            SelectedStrategy::MicroScalp => Some(&self.micro_scalp),
            SelectedStrategy::TrendRider => Some(&self.trend_rider),
            SelectedStrategy::NoTrade => None,
        }
    }

    pub fn get_mut(&mut self, strategy: SelectedStrategy) -> Option<&mut Signal> {
        match strategy {
            SelectedStrategy::Swing => Some(&mut self.swing),
            SelectedStrategy::Trend4h => Some(&mut self.trend_4h),
            SelectedStrategy::Scalp1h => Some(&mut self.scalp_1h),
            SelectedStrategy::MicroScalp => Some(&mut self.micro_scalp),
            SelectedStrategy::TrendRider => Some(&mut self.trend_rider),
            SelectedStrategy::NoTrade => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SelectedStrategy, &Signal)> {
        [
            SelectedStrategy::Swing,
            SelectedStrategy::Trend4h,
            SelectedStrategy::Scalp1h,
            SelectedStrategy::MicroScalp,
            SelectedStrategy::TrendRider,
        ]
        .into_iter()
        .map(move |s| (s, self.get(s).expect("all five strategies have a slot")))
    }
}

/// Aggregator output: all five strategies evaluated for one symbol under one mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichSymbol {
    pub symbol: String,
    pub mode: Mode,
    pub current_price: f64,
    pub htf_bias: HtfBias,
    pub timeframes: TimeframeMap,
    pub strategies: StrategySignals,
    pub best_signal: Option<SelectedStrategy>,
    pub override_used: bool,
    pub override_notes: Vec<String>,
    /// Raw upstream market-data payload, when the caller wants it echoed back
    /// alongside the derived analysis. Populated by external collaborators
    /// outside this crate; `null` when nothing was supplied.
    pub market_data: Option<serde_json::Value>,
    /// Raw order-flow payload from an external d-flow feed, echoed back the
    /// same way as `market_data`.
    pub dflow_data: Option<serde_json::Value>,
    pub schema_version: u32,
    pub json_version: u32,
    pub generated_at: i64,
}

pub const SCHEMA_VERSION: u32 = 1;
pub const JSON_VERSION: u32 = 1;
