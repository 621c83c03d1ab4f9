use crate::domain::chart_features::PriceActionPatterns;
use crate::domain::market::Candle;

/// Patterns read off the last two candles. Defaults to all-false when fewer
/// than two candles are available.
pub fn price_action_patterns(candles: &[Candle]) -> PriceActionPatterns {
    let Some(current) = candles.last() else {
        return PriceActionPatterns::default();
    };
    let range = current.range();
    if range <= 0.0 {
        return PriceActionPatterns::default();
    }

    let upper_wick_pct = current.upper_wick() / range * 100.0;
    let lower_wick_pct = current.lower_wick() / range * 100.0;
    let body_pct = current.body() / range * 100.0;
    let close_in_lower_half = (current.close - current.low) / range < 0.5;
    let close_in_upper_half = (current.close - current.low) / range > 0.5;

    let rejection_up = upper_wick_pct > 50.0 && body_pct < 30.0 && close_in_lower_half;
    let rejection_down = lower_wick_pct > 50.0 && body_pct < 30.0 && close_in_upper_half;

    let Some(prev) = (candles.len() >= 2).then(|| candles[candles.len() - 2]) else {
        return PriceActionPatterns {
            rejection_up,
            rejection_down,
            engulfing_bull: false,
            engulfing_bear: false,
            inside_bar: false,
        };
    };

    let engulfing_bull =
        prev.is_bearish() && current.is_bullish() && current.open <= prev.close && current.close >= prev.open;
    let engulfing_bear =
        prev.is_bullish() && current.is_bearish() && current.open >= prev.close && current.close <= prev.open;
    let inside_bar = current.high <= prev.high && current.low >= prev.low;

    PriceActionPatterns {
        rejection_up,
        rejection_down,
        engulfing_bull,
        engulfing_bear,
        inside_bar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(o: f64, h: f64, l: f64, c: f64) -> Candle {
        Candle::new(0, o, h, l, c, 100.0)
    }

    #[test]
    fn inside_bar_detected() {
        let candles = vec![candle(10.0, 12.0, 8.0, 11.0), candle(10.5, 11.5, 9.5, 10.8)];
        let patterns = price_action_patterns(&candles);
        assert!(patterns.inside_bar);
    }

    #[test]
    fn rejection_up_on_long_upper_wick() {
        // range=3, upper wick = 10-9.2=0.8? need >50% upper wick: high=10,open/close near low
        let candles = vec![candle(7.2, 10.0, 7.0, 7.3)];
        let patterns = price_action_patterns(&candles);
        assert!(patterns.rejection_up);
    }

    #[test]
    fn fewer_than_two_candles_has_no_two_candle_patterns() {
        let candles = vec![candle(10.0, 11.0, 9.0, 10.5)];
        let patterns = price_action_patterns(&candles);
        assert!(!patterns.engulfing_bull);
        assert!(!patterns.inside_bar);
    }
}
