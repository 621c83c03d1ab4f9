use crate::domain::chart_features::{FairValueGap, StructureDirection};
use crate::domain::market::Candle;

const LOOKBACK: usize = 50;

/// A bullish FVG is a gap between candle[i-1].high and candle[i+1].low left
/// by a strong displacement candle at i; bearish is the mirror. Unlike a
/// single most-recent-gap scan, this returns every unfilled-or-filled gap in
/// the lookback window, most recent last.
pub fn fair_value_gaps(candles: &[Candle]) -> Vec<FairValueGap> {
    if candles.len() < 3 {
        return Vec::new();
    }
    let start = candles.len().saturating_sub(LOOKBACK).max(1);
    let end = candles.len() - 1;

    let mut gaps = Vec::new();
    for i in start..end {
        let left = &candles[i - 1];
        let right = &candles[i + 1];

        if right.low > left.high {
            let (top, bottom) = (right.low, left.high);
            let filled = candles[i + 1..].iter().any(|c| c.low <= bottom);
            gaps.push(FairValueGap {
                direction: StructureDirection::Bullish,
                top,
                bottom,
                filled,
                index: i,
            });
        } else if right.high < left.low {
            let (top, bottom) = (left.low, right.high);
            let filled = candles[i + 1..].iter().any(|c| c.high >= top);
            gaps.push(FairValueGap {
                direction: StructureDirection::Bearish,
                top,
                bottom,
                filled,
                index: i,
            });
        }
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(o: f64, h: f64, l: f64, c: f64) -> Candle {
        Candle::new(0, o, h, l, c, 100.0)
    }

    #[test]
    fn short_series_has_no_gaps() {
        assert!(fair_value_gaps(&[candle(1.0, 2.0, 0.5, 1.5)]).is_empty());
    }

    #[test]
    fn detects_bullish_gap() {
        let candles = vec![
            candle(10.0, 11.0, 9.0, 10.5),
            candle(10.5, 15.0, 10.4, 14.8),
            candle(14.8, 16.0, 13.0, 15.5),
        ];
        let gaps = fair_value_gaps(&candles);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].direction, StructureDirection::Bullish);
    }

    #[test]
    fn marks_gap_filled_when_later_candle_retraces() {
        let candles = vec![
            candle(10.0, 11.0, 9.0, 10.5),
            candle(10.5, 15.0, 10.4, 14.8),
            candle(14.8, 16.0, 13.0, 15.5),
            candle(15.0, 15.2, 9.0, 9.5),
        ];
        let gaps = fair_value_gaps(&candles);
        assert!(gaps[0].filled);
    }
}
