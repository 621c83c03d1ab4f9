use super::adx_atr::adx;
use super::candlestick::{classify_candlestick_patterns, classify_wick};
use super::ema::ema_series;
use super::rsi::rsi_series;
use super::stoch_rsi::stoch_rsi;
use crate::domain::indicators::*;
use crate::domain::market::Candle;

const EMA_SHORT: usize = 21;
const EMA_LONG: usize = 200;
const RSI_PERIOD: usize = 14;
const ADX_PERIOD: usize = 14;

/// Classifies trend as a pure function of `(price, ema21, ema200)`.
pub fn classify_trend(price: f64, ema21: f64, ema200: f64) -> Trend {
    if price > ema21 && ema21 > ema200 {
        Trend::Uptrend
    } else if price < ema21 && ema21 < ema200 {
        Trend::Downtrend
    } else {
        Trend::Flat
    }
}

/// Classifies pullback state from the signed distance-from-EMA21 percentage.
pub fn classify_pullback(distance_pct: f64) -> PullbackState {
    let abs = distance_pct.abs();
    if abs < 0.5 {
        PullbackState::EntryZone
    } else if abs > 3.0 {
        PullbackState::Overextended
    } else {
        PullbackState::Retracing
    }
}

/// Builds the uniform `Indicators` record for a candle series. Every slot is
/// individually null-safe: a short series never prevents the other fields
/// from being computed.
pub fn build_indicators(candles: &[Candle]) -> Indicators {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let last = candles.last();

    let price = PriceBlock {
        current: last.map(|c| c.close).unwrap_or(0.0),
        high: candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max),
        low: candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min),
    };
    let price = if candles.is_empty() {
        PriceBlock { current: 0.0, high: 0.0, low: 0.0 }
    } else {
        price
    };

    let ema21_series = ema_series(&closes, EMA_SHORT);
    let ema200_series = ema_series(&closes, EMA_LONG);

    let ema = EmaBlock {
        ema21: ema21_series.as_ref().and_then(|s| s.last().copied()),
        ema200: ema200_series.as_ref().and_then(|s| s.last().copied()),
        ema21_history: ema21_series.unwrap_or_default(),
        ema200_history: ema200_series.unwrap_or_default(),
    };

    let stoch = stoch_rsi(&closes).unwrap_or(StochRsiWithHistory {
        k: 50.0,
        d: 50.0,
        condition: StochCondition::Neutral,
        history: Vec::new(),
    });

    let rsi = rsi_series(&closes, RSI_PERIOD).and_then(|series| {
        series.last().map(|&value| RsiBlock {
            value,
            history: series.clone(),
            overbought: value > 70.0,
            oversold: value < 30.0,
        })
    });

    let (trend, pullback_state, distance) = match (ema.ema21, ema.ema200) {
        (Some(e21), Some(e200)) => {
            let distance = if e21 != 0.0 {
                (price.current - e21) / e21 * 100.0
            } else {
                0.0
            };
            (classify_trend(price.current, e21, e200), classify_pullback(distance), distance)
        }
        _ => (Trend::Flat, PullbackState::Unknown, 0.0),
    };

    let analysis = AnalysisBlock {
        trend,
        pullback_state,
        distance_from21_ema: distance,
    };

    let trend_strength = adx(candles, ADX_PERIOD);

    let candlestick_patterns = last
        .map(|c| {
            let prev = if candles.len() >= 2 { candles.get(candles.len() - 2) } else { None };
            classify_candlestick_patterns(prev, c)
        })
        .unwrap_or_default();

    let wick_analysis = last.map(classify_wick).unwrap_or_default();

    let metadata = Metadata {
        candle_count: candles.len(),
        last_update: last.map(|c| c.timestamp_ms).unwrap_or(0),
    };

    Indicators {
        price,
        ema,
        stoch_rsi: stoch,
        rsi,
        analysis,
        trend_strength,
        candlestick_patterns,
        wick_analysis,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(ts: i64, o: f64, h: f64, l: f64, c: f64) -> Candle {
        Candle::new(ts, o, h, l, c, 1000.0)
    }

    #[test]
    fn short_series_has_structurally_complete_record() {
        let candles = vec![candle(0, 1.0, 1.1, 0.9, 1.05); 3];
        let indicators = build_indicators(&candles);
        assert!(indicators.ema.ema21.is_none());
        assert!(indicators.rsi.is_none());
        assert!(indicators.trend_strength.is_none());
        assert_eq!(indicators.metadata.candle_count, 3);
    }

    #[test]
    fn trend_classification_pure_function() {
        assert_eq!(classify_trend(100.0, 95.0, 90.0), Trend::Uptrend);
        assert_eq!(classify_trend(80.0, 95.0, 100.0), Trend::Downtrend);
        assert_eq!(classify_trend(100.0, 100.0, 90.0), Trend::Flat);
    }

    #[test]
    fn pullback_classification_thresholds() {
        assert_eq!(classify_pullback(0.2), PullbackState::EntryZone);
        assert_eq!(classify_pullback(-0.2), PullbackState::EntryZone);
        assert_eq!(classify_pullback(2.0), PullbackState::Retracing);
        assert_eq!(classify_pullback(5.0), PullbackState::Overextended);
    }
}
