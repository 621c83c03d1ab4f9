use crate::application::chart_features::build_chart_features;
use crate::application::indicators::{atr, atr_pct_state, build_indicators, detect_swing_points, DEFAULT_SWING_LOOKBACK};
use crate::domain::market::{Candle, IntervalCode};
use crate::domain::signal::{TimeframeAnalysis, Volatility, VolatilityState, VolumeDirection, VolumeSummary};

const ATR_PERIOD: usize = 14;
const VOLUME_AVG_PERIOD: usize = 20;

/// Builds the full per-interval composite from a single candle series. Every
/// field is present regardless of series length; short series fall back to
/// zeroed/`None`/empty slots rather than an error, matching the contract
/// carried down from `Indicators` and `ChartFeatures`. `interval` is passed
/// through so chart features gated to specific timeframes (VWAP, Bollinger,
/// MA-stack, support/resistance) are only populated where they apply.
pub fn build_timeframe_analysis(candles: &[Candle], interval: IntervalCode) -> TimeframeAnalysis {
    let indicators = build_indicators(candles);
    let chart_features = build_chart_features(candles, &indicators, interval);
    let structure = detect_swing_points(candles, DEFAULT_SWING_LOOKBACK).unwrap_or_default();

    let last_candle = candles.last().copied().unwrap_or(Candle::new(0, 0.0, 0.0, 0.0, 0.0, 0.0));

    let volatility = atr(candles, ATR_PERIOD)
        .map(|value| {
            let atr_pct_of_price = if last_candle.close != 0.0 {
                value / last_candle.close * 100.0
            } else {
                0.0
            };
            Volatility {
                atr: value,
                atr_pct_of_price,
                state: atr_pct_state(atr_pct_of_price),
            }
        })
        .unwrap_or(Volatility {
            atr: 0.0,
            atr_pct_of_price: 0.0,
            state: VolatilityState::Low,
        });

    let volume = volume_summary(candles);

    TimeframeAnalysis {
        indicators,
        structure,
        candle_count: candles.len(),
        last_candle,
        market_structure: chart_features.market_structure,
        volatility,
        volume,
        volume_profile: chart_features.volume_profile.clone(),
        liquidity_zones: chart_features.liquidity_zones.clone(),
        fair_value_gaps: chart_features.fair_value_gaps.clone(),
        divergences: chart_features.divergences.clone(),
        chart_features,
    }
}

fn volume_summary(candles: &[Candle]) -> Option<VolumeSummary> {
    let current = candles.last()?.volume;
    if candles.len() < VOLUME_AVG_PERIOD {
        return None;
    }
    let window = &candles[candles.len() - VOLUME_AVG_PERIOD..];
    let avg20 = window.iter().map(|c| c.volume).sum::<f64>() / VOLUME_AVG_PERIOD as f64;

    let trend = if avg20 <= 0.0 {
        VolumeDirection::Neutral
    } else if current > avg20 * 1.2 {
        VolumeDirection::Up
    } else if current < avg20 * 0.8 {
        VolumeDirection::Down
    } else {
        VolumeDirection::Neutral
    };

    Some(VolumeSummary { current, avg20, trend })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: i64, v: f64) -> Candle {
        let base = 100.0 + (i as f64 * 0.05).sin() * 3.0;
        Candle::new(i * 60_000, base, base + 1.0, base - 1.0, base + 0.1, v)
    }

    #[test]
    fn empty_series_is_fully_populated() {
        let analysis = build_timeframe_analysis(&[], IntervalCode::OneHour);
        assert_eq!(analysis.candle_count, 0);
        assert!(analysis.volume.is_none());
        assert_eq!(analysis.volatility.atr, 0.0);
    }

    #[test]
    fn long_series_populates_volume_trend() {
        let candles: Vec<Candle> = (0..60).map(|i| candle(i, 100.0)).collect();
        let analysis = build_timeframe_analysis(&candles, IntervalCode::OneHour);
        assert!(analysis.volume.is_some());
        assert_eq!(analysis.candle_count, 60);
    }

    #[test]
    fn monthly_interval_suppresses_gated_features() {
        let candles: Vec<Candle> = (0..260).map(|i| candle(i, 100.0)).collect();
        let analysis = build_timeframe_analysis(&candles, IntervalCode::OneMonth);
        assert!(analysis.chart_features.advanced.vwap.is_none());
        assert!(analysis.chart_features.advanced.ma_stack.is_none());
        assert!(analysis.chart_features.support_resistance.resistance.is_none());
    }
}
