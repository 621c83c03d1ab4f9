use crate::domain::chart_features::{CandleAnatomy, CandleDirection, RawOhlc};
use crate::domain::market::Candle;

/// Anatomy of the last candle. All percentages are of the candle's
/// high-low range; a zero-range candle is a doji with every percentage zero.
pub fn candle_anatomy(candle: &Candle, ema21: Option<f64>) -> CandleAnatomy {
    let range = candle.range();

    let raw = RawOhlc {
        open: candle.open,
        high: candle.high,
        low: candle.low,
        close: candle.close,
    };

    if range <= 0.0 {
        return CandleAnatomy {
            direction: CandleDirection::Doji,
            body_pct: 0.0,
            upper_wick_pct: 0.0,
            lower_wick_pct: 0.0,
            close_relative_to_range: 0.0,
            close_above_ema21: ema21.is_some_and(|e| candle.close > e),
            close_below_ema21: ema21.is_some_and(|e| candle.close < e),
            raw,
        };
    }

    let body_pct = candle.body() / range * 100.0;
    let upper_wick_pct = candle.upper_wick() / range * 100.0;
    let lower_wick_pct = candle.lower_wick() / range * 100.0;
    let close_relative_to_range = (candle.close - candle.low) / range * 100.0;

    let direction = if body_pct < 5.0 {
        CandleDirection::Doji
    } else if candle.is_bullish() {
        CandleDirection::Bull
    } else {
        CandleDirection::Bear
    };

    CandleAnatomy {
        direction,
        body_pct,
        upper_wick_pct,
        lower_wick_pct,
        close_relative_to_range,
        close_above_ema21: ema21.is_some_and(|e| candle.close > e),
        close_below_ema21: ema21.is_some_and(|e| candle.close < e),
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_range_is_doji() {
        let c = Candle::new(0, 10.0, 10.0, 10.0, 10.0, 1.0);
        let anatomy = candle_anatomy(&c, None);
        assert_eq!(anatomy.direction, CandleDirection::Doji);
        assert_eq!(anatomy.body_pct, 0.0);
    }

    #[test]
    fn close_relative_to_range_bounds() {
        let c = Candle::new(0, 10.0, 12.0, 9.0, 12.0, 1.0);
        let anatomy = candle_anatomy(&c, None);
        assert!((anatomy.close_relative_to_range - 100.0).abs() < 1e-9);
    }
}
