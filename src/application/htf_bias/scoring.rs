use crate::domain::indicators::{StochCondition, Trend};
use crate::domain::signal::{BiasDirection, BiasSource, HtfBias, TimeframeAnalysis};

const TREND_4H_WEIGHT: f64 = 2.0;
const TREND_1H_WEIGHT: f64 = 1.0;
const STOCH_WEIGHT: f64 = 0.5;

/// Scores 4h and 1h summaries into a directional bias. Weights are fixed
/// constants; ties break to neutral.
pub fn compute_htf_bias(tf4h: Option<&TimeframeAnalysis>, tf1h: Option<&TimeframeAnalysis>) -> HtfBias {
    let (long_4h, short_4h) = trend_score(tf4h, TREND_4H_WEIGHT);
    let (long_1h, short_1h) = trend_score(tf1h, TREND_1H_WEIGHT);
    let (long_stoch_4h, short_stoch_4h) = stoch_score(tf4h, STOCH_WEIGHT);
    let (long_stoch_1h, short_stoch_1h) = stoch_score(tf1h, STOCH_WEIGHT);

    let long_total = long_4h + long_1h + long_stoch_4h + long_stoch_1h;
    let short_total = short_4h + short_1h + short_stoch_4h + short_stoch_1h;
    let total = long_total + short_total;

    if total <= 0.0 || (long_total - short_total).abs() < f64::EPSILON {
        return HtfBias::default();
    }

    let (direction, winner, four_h_contribution, one_h_contribution) = if long_total > short_total {
        (BiasDirection::Long, long_total, long_4h + long_stoch_4h, long_1h + long_stoch_1h)
    } else {
        (BiasDirection::Short, short_total, short_4h + short_stoch_4h, short_1h + short_stoch_1h)
    };

    let confidence = ((winner / total) * 100.0).round().clamp(0.0, 100.0) as u8;

    let source = if four_h_contribution > one_h_contribution {
        BiasSource::FourHour
    } else if four_h_contribution <= 0.0 && one_h_contribution > 0.0 {
        BiasSource::OneHour
    } else {
        BiasSource::Mixed
    };

    HtfBias { direction, confidence, source }
}

fn trend_score(tf: Option<&TimeframeAnalysis>, weight: f64) -> (f64, f64) {
    match tf.map(|a| a.indicators.analysis.trend) {
        Some(Trend::Uptrend) => (weight, 0.0),
        Some(Trend::Downtrend) => (0.0, weight),
        _ => (0.0, 0.0),
    }
}

fn stoch_score(tf: Option<&TimeframeAnalysis>, weight: f64) -> (f64, f64) {
    match tf.map(|a| a.indicators.stoch_rsi.condition) {
        Some(StochCondition::Bullish) | Some(StochCondition::Oversold) => (weight, 0.0),
        Some(StochCondition::Bearish) | Some(StochCondition::Overbought) => (0.0, weight),
        _ => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::timeframe_analysis::build_timeframe_analysis;
    use crate::domain::market::{Candle, IntervalCode};

    fn uptrend_candles() -> Vec<Candle> {
        (0..220)
            .map(|i| {
                let base = 50.0 + i as f64 * 0.5;
                Candle::new(i as i64 * 60_000, base, base + 1.0, base - 1.0, base + 0.5, 10.0)
            })
            .collect()
    }

    #[test]
    fn no_data_is_none_source() {
        let bias = compute_htf_bias(None, None);
        assert_eq!(bias.source, BiasSource::None);
        assert_eq!(bias.direction, BiasDirection::Neutral);
    }

    #[test]
    fn strong_4h_uptrend_yields_long_bias_sourced_from_4h() {
        let candles = uptrend_candles();
        let tf4h = build_timeframe_analysis(&candles, IntervalCode::FourHour);
        let bias = compute_htf_bias(Some(&tf4h), None);
        assert_eq!(bias.direction, BiasDirection::Long);
        assert_eq!(bias.source, BiasSource::FourHour);
        assert!(bias.confidence > 0);
    }
}
