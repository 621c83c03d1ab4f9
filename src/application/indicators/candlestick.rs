use crate::domain::indicators::{CandlestickPatterns, WickAnalysis};
use crate::domain::market::Candle;

/// A wick is a "rejection" if it's at least twice the body and more than
/// half the candle's range. Bullish when the rejection is on the lower
/// wick, bearish on the upper.
pub fn classify_wick(candle: &Candle) -> WickAnalysis {
    let range = candle.range();
    if range <= 0.0 {
        return WickAnalysis::default();
    }

    let body = candle.body();
    let upper = candle.upper_wick();
    let lower = candle.lower_wick();

    let is_rejection = |wick: f64| wick >= 2.0 * body && wick > 0.5 * range;

    let bullish_rejection = is_rejection(lower);
    let bearish_rejection = is_rejection(upper);

    WickAnalysis {
        rejection: bullish_rejection || bearish_rejection,
        bullish_rejection,
        bearish_rejection,
    }
}

pub fn classify_candlestick_patterns(prev: Option<&Candle>, current: &Candle) -> CandlestickPatterns {
    let range = current.range();
    let doji = range > 0.0 && current.body() / range < 0.1;

    let (bullish_engulfing, bearish_engulfing) = match prev {
        Some(p) => (
            p.is_bearish() && current.is_bullish() && current.open <= p.close && current.close >= p.open,
            p.is_bullish() && current.is_bearish() && current.open >= p.close && current.close <= p.open,
        ),
        None => (false, false),
    };

    CandlestickPatterns {
        bullish_engulfing,
        bearish_engulfing,
        doji,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(o: f64, h: f64, l: f64, c: f64) -> Candle {
        Candle::new(0, o, h, l, c, 100.0)
    }

    #[test]
    fn zero_range_is_default() {
        let c = candle(10.0, 10.0, 10.0, 10.0);
        assert_eq!(classify_wick(&c), WickAnalysis::default());
    }

    #[test]
    fn long_lower_wick_is_bullish_rejection() {
        // body=0.2 (9.8-10.0), lower wick = 9.8-8.0=1.8 >= 2*0.2=0.4, range=2.2, wick>0.5*2.2=1.1
        let c = candle(10.0, 10.2, 8.0, 9.8);
        let wick = classify_wick(&c);
        assert!(wick.bullish_rejection);
        assert!(!wick.bearish_rejection);
    }

    #[test]
    fn bullish_engulfing_detected() {
        let prev = candle(10.0, 10.1, 9.0, 9.2);
        let current = candle(9.1, 10.5, 9.0, 10.3);
        let patterns = classify_candlestick_patterns(Some(&prev), &current);
        assert!(patterns.bullish_engulfing);
        assert!(!patterns.bearish_engulfing);
    }
}
