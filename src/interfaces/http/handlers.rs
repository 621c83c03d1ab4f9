use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::application::pipeline::{build_timeframe_map, htf_bias_for};
use crate::application::strategies::{evaluate_all_strategies, evaluate_strategy};
use crate::domain::errors::InputError;
use crate::domain::market::{parse_interval_list, IntervalCode};
use crate::domain::signal::{Direction, Mode, RichSymbol, SetupType, JSON_VERSION, SCHEMA_VERSION};

use super::errors::ApiError;
use super::AppState;

const DEFAULT_ANALYZE_INTERVALS: &str = "4h,1h,15m,5m";
const DEFAULT_FULL_INTERVALS: &str = "1M,1w,3d,1d,4h,1h,15m,5m,3m,1m";
const DEFAULT_SCAN_INTERVALS: &str = "4h,1h,15m,5m";
const DEFAULT_SCAN_SYMBOL_COUNT: usize = 5;

fn parse_mode(raw: Option<&str>) -> Result<Mode, InputError> {
    match raw.unwrap_or("STANDARD").to_uppercase().as_str() {
        "STANDARD" | "SAFE" => Ok(Mode::Safe),
        "AGGRESSIVE" => Ok(Mode::Aggressive),
        other => Err(InputError::InvalidParameter {
            name: "mode".to_string(),
            value: other.to_string(),
            reason: "expected STANDARD or AGGRESSIVE".to_string(),
        }),
    }
}

fn parse_setup_type(raw: Option<&str>) -> Result<SetupType, InputError> {
    match raw.unwrap_or("auto").to_lowercase().as_str() {
        "auto" => Ok(SetupType::Auto),
        "swing" => Ok(SetupType::Swing),
        "4h" => Ok(SetupType::FourHour),
        "scalp" => Ok(SetupType::Scalp),
        "microscalp" | "micro_scalp" => Ok(SetupType::MicroScalp),
        other => Err(InputError::InvalidParameter {
            name: "setupType".to_string(),
            value: other.to_string(),
            reason: "expected auto, swing, 4h, scalp, or microscalp".to_string(),
        }),
    }
}

fn parse_intervals(raw: &str) -> Result<Vec<IntervalCode>, InputError> {
    parse_interval_list(raw).map_err(|e| InputError::InvalidIntervals { raw: raw.to_string(), reason: e.to_string() })
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    intervals: Option<String>,
    #[serde(rename = "setupType")]
    setup_type: Option<String>,
    mode: Option<String>,
}

pub async fn analyze(State(state): State<AppState>, Path(symbol): Path<String>, Query(q): Query<AnalyzeQuery>) -> Result<Json<Value>, ApiError> {
    let intervals = parse_intervals(q.intervals.as_deref().unwrap_or(DEFAULT_ANALYZE_INTERVALS))?;
    let setup_type = parse_setup_type(q.setup_type.as_deref())?;
    let mode = parse_mode(q.mode.as_deref())?;

    let timeframes = build_timeframe_map(&state.market_data, &symbol, &intervals, state.default_candle_limit).await?;
    let htf_bias = htf_bias_for(&timeframes);
    let now = now_ms();
    let signal = evaluate_strategy(&timeframes, setup_type, mode, htf_bias, now);

    let current_price = timeframes.get(IntervalCode::OneHour).or_else(|| intervals.first().and_then(|i| timeframes.get(*i))).map(|a| a.indicators.price.current).unwrap_or(0.0);

    let ticker = state.market_data.get_ticker_price(&symbol).await.ok();
    let price_change_24h = ticker.map(|t| t.price_change_percent).unwrap_or(0.0);

    let signal_json = serde_json::to_value(&signal).map_err(|e| anyhow::anyhow!(e))?;

    Ok(Json(json!({
        "symbol": symbol,
        "currentPrice": current_price,
        "priceChange24h": price_change_24h,
        "htfBias": htf_bias,
        "signal": signal_json,
        "tradeSignal": signal_json,
        "analysis": timeframes,
        "timestamp": now,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeFullQuery {
    symbol: String,
    mode: Option<String>,
    intervals: Option<String>,
}

pub async fn analyze_full(State(state): State<AppState>, Query(q): Query<AnalyzeFullQuery>) -> Result<Json<RichSymbol>, ApiError> {
    let intervals = parse_intervals(q.intervals.as_deref().unwrap_or(DEFAULT_FULL_INTERVALS))?;
    let mode = parse_mode(q.mode.as_deref())?;

    let timeframes = build_timeframe_map(&state.market_data, &q.symbol, &intervals, state.default_candle_limit).await?;
    let htf_bias = htf_bias_for(&timeframes);
    let now = now_ms();

    let current_price = timeframes.get(IntervalCode::OneHour).map(|a| a.indicators.price.current).unwrap_or(0.0);

    let aggregate = evaluate_all_strategies(&timeframes, mode, htf_bias, now);

    Ok(Json(RichSymbol {
        symbol: q.symbol,
        mode,
        current_price,
        htf_bias,
        timeframes,
        strategies: aggregate.strategies,
        best_signal: aggregate.best_signal,
        override_used: aggregate.override_used,
        override_notes: aggregate.override_notes,
        market_data: None,
        dflow_data: None,
        schema_version: SCHEMA_VERSION,
        json_version: JSON_VERSION,
        generated_at: now,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    #[serde(rename = "minConfidence")]
    min_confidence: Option<u8>,
    #[serde(rename = "maxResults")]
    max_results: Option<usize>,
    intervals: Option<String>,
    direction: Option<String>,
    all: Option<bool>,
}

#[derive(Debug, Serialize)]
struct Opportunity {
    symbol: String,
    direction: Direction,
    confidence: u8,
    #[serde(rename = "selectedStrategy")]
    selected_strategy: crate::domain::signal::SelectedStrategy,
    signal: crate::domain::signal::Signal,
}

pub async fn scan(State(state): State<AppState>, Query(q): Query<ScanQuery>) -> Result<Json<Value>, ApiError> {
    let intervals = parse_intervals(q.intervals.as_deref().unwrap_or(DEFAULT_SCAN_INTERVALS))?;
    let min_confidence = q.min_confidence.unwrap_or(0);
    let max_results = q.max_results.unwrap_or(10);
    let direction_filter = match q.direction.as_deref() {
        Some("long") => Some(Direction::Long),
        Some("short") => Some(Direction::Short),
        Some(other) => {
            return Err(InputError::InvalidParameter { name: "direction".to_string(), value: other.to_string(), reason: "expected long or short".to_string() }.into())
        }
        None => None,
    };

    let all_pairs = state.market_data.get_all_pairs();
    let scan_set: Vec<_> = if q.all.unwrap_or(false) {
        all_pairs
    } else {
        all_pairs.into_iter().take(DEFAULT_SCAN_SYMBOL_COUNT).collect()
    };

    let mut opportunities = Vec::new();
    let mut scanned = 0usize;
    for info in &scan_set {
        scanned += 1;
        let timeframes = match build_timeframe_map(&state.market_data, &info.symbol, &intervals, state.default_candle_limit).await {
            Ok(tf) => tf,
            Err(e) => {
                warn!(symbol = %info.symbol, error = %e, "scan: skipping symbol");
                continue;
            }
        };
        let htf_bias = htf_bias_for(&timeframes);
        let now = now_ms();
        let aggregate = evaluate_all_strategies(&timeframes, Mode::Safe, htf_bias, now);

        if let Some(best) = aggregate.best_signal {
            if let Some(signal) = aggregate.strategies.get(best) {
                let passes_confidence = signal.confidence >= min_confidence;
                let passes_direction = direction_filter.map(|d| signal.direction == d).unwrap_or(true);
                if signal.valid && passes_confidence && passes_direction {
                    opportunities.push(Opportunity {
                        symbol: info.symbol.clone(),
                        direction: signal.direction,
                        confidence: signal.confidence,
                        selected_strategy: best,
                        signal: signal.clone(),
                    });
                }
            }
        }

        if scanned < scan_set.len() {
            tokio::time::sleep(state.scan_throttle).await;
        }
    }

    opportunities.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    opportunities.truncate(max_results);

    info!(scanned, found = opportunities.len(), "scan complete");

    Ok(Json(json!({
        "summary": { "scanned": scanned, "matched": opportunities.len() },
        "opportunities": opportunities,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SymbolsQuery {
    all: Option<bool>,
}

pub async fn symbols(State(state): State<AppState>, Query(q): Query<SymbolsQuery>) -> Result<Json<Value>, ApiError> {
    if q.all.unwrap_or(false) {
        if let Some(discovery) = &state.pair_discovery {
            match discovery.discover().await {
                Ok(pairs) => {
                    return Ok(Json(json!({
                        "count": pairs.len(),
                        "symbols": pairs,
                        "source": "kraken-dynamic",
                    })))
                }
                Err(e) => warn!(error = %e, "dynamic pair discovery failed, falling back to static table"),
            }
        }
    }

    let pairs = state.market_data.get_all_pairs();
    Ok(Json(json!({
        "count": pairs.len(),
        "symbols": pairs,
        "source": "static",
    })))
}
