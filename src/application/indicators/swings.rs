use crate::domain::market::{Candle, SwingPoints};

/// Swing high/low over the last `lookback` candles: simple min/max of that
/// window's range. Falls back to whatever candles are available when the
/// series is shorter than `lookback`; returns `None` only for an empty series.
pub fn detect_swing_points(candles: &[Candle], lookback: usize) -> Option<SwingPoints> {
    if candles.is_empty() {
        return None;
    }
    let start = candles.len().saturating_sub(lookback);
    let window = &candles[start..];

    let swing_high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let swing_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

    Some(SwingPoints { swing_high, swing_low })
}

pub const DEFAULT_SWING_LOOKBACK: usize = 20;

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(h: f64, l: f64) -> Candle {
        Candle::new(0, h, h, l, h, 0.0)
    }

    #[test]
    fn empty_series_is_none() {
        assert!(detect_swing_points(&[], 20).is_none());
    }

    #[test]
    fn uses_min_max_of_window() {
        let candles = vec![candle(10.0, 8.0), candle(12.0, 9.0), candle(11.0, 7.0)];
        let swings = detect_swing_points(&candles, 20).unwrap();
        assert_eq!(swings.swing_high, 12.0);
        assert_eq!(swings.swing_low, 7.0);
    }

    #[test]
    fn truncates_to_available_candles_when_shorter_than_lookback() {
        let candles = vec![candle(10.0, 8.0)];
        let swings = detect_swing_points(&candles, 20).unwrap();
        assert_eq!(swings.swing_high, 10.0);
        assert_eq!(swings.swing_low, 8.0);
    }
}
