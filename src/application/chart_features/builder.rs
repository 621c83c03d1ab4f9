use crate::domain::chart_features::ChartFeatures;
use crate::domain::indicators::Indicators;
use crate::domain::market::{Candle, IntervalCode};

use super::advanced::advanced_indicators;
use super::anatomy::candle_anatomy;
use super::divergences::divergences;
use super::fair_value_gaps::fair_value_gaps;
use super::liquidity_zones::liquidity_zones;
use super::market_structure::market_structure;
use super::price_action::price_action_patterns;
use super::support_resistance::support_resistance;
use super::volume_profile::volume_profile;

/// Composes every chart-structure feature from a single candle series. Every
/// field is always present; short series simply produce empty/`None` slots
/// rather than an error, matching `Indicators`' null-safety contract.
/// `interval` gates the features that are only meaningful on some
/// timeframes (VWAP, Bollinger, MA-stack, support/resistance).
pub fn build_chart_features(candles: &[Candle], indicators: &Indicators, interval: IntervalCode) -> ChartFeatures {
    let ema21 = indicators.ema.ema21;
    let candle_anatomy = candles
        .last()
        .map(|c| candle_anatomy(c, ema21))
        .unwrap_or_else(|| candle_anatomy(&Candle::new(0, 0.0, 0.0, 0.0, 0.0, 0.0), None));

    ChartFeatures {
        candle_anatomy,
        price_action: price_action_patterns(candles),
        support_resistance: support_resistance(candles, interval),
        market_structure: market_structure(candles),
        liquidity_zones: liquidity_zones(candles),
        fair_value_gaps: fair_value_gaps(candles),
        divergences: divergences(candles, indicators),
        volume_profile: volume_profile(candles),
        advanced: advanced_indicators(candles, interval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::indicators::build_indicators;

    #[test]
    fn empty_series_produces_fully_populated_defaults() {
        let candles: Vec<Candle> = Vec::new();
        let indicators = build_indicators(&candles);
        let features = build_chart_features(&candles, &indicators, IntervalCode::OneHour);
        assert!(features.liquidity_zones.is_empty());
        assert!(features.fair_value_gaps.is_empty());
        assert!(features.advanced.vwap.is_none());
    }

    #[test]
    fn long_series_populates_advanced_block_on_eligible_interval() {
        let candles: Vec<Candle> = (0..250)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.1).sin() * 5.0;
                Candle::new(i as i64 * 60_000, base, base + 1.0, base - 1.0, base + 0.2, 10.0)
            })
            .collect();
        let indicators = build_indicators(&candles);
        let features = build_chart_features(&candles, &indicators, IntervalCode::OneHour);
        assert!(features.advanced.vwap.is_some());
        assert!(features.advanced.ma_stack.is_some());
    }

    #[test]
    fn long_series_suppresses_advanced_block_on_ineligible_interval() {
        let candles: Vec<Candle> = (0..250)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.1).sin() * 5.0;
                Candle::new(i as i64 * 60_000, base, base + 1.0, base - 1.0, base + 0.2, 10.0)
            })
            .collect();
        let indicators = build_indicators(&candles);
        let features = build_chart_features(&candles, &indicators, IntervalCode::OneWeek);
        assert!(features.advanced.vwap.is_none());
        assert!(features.advanced.ma_stack.is_none());
        assert!(features.support_resistance.resistance.is_none());
    }
}
