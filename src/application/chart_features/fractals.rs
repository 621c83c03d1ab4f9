use crate::domain::market::Candle;

pub const FRACTAL_RANGE: usize = 3;

/// A candle is a fractal (swing) high when it's strictly higher than the
/// `range` candles to its left and at least as high as the `range` candles
/// to its right (non-strict on the right avoids double-counting plateaus).
pub fn is_pivot_high(candles: &[Candle], index: usize, range: usize) -> bool {
    if index < range || index + range >= candles.len() {
        return false;
    }
    let high = candles[index].high;
    (1..=range).all(|i| candles[index - i].high < high) && (1..=range).all(|i| candles[index + i].high <= high)
}

pub fn is_pivot_low(candles: &[Candle], index: usize, range: usize) -> bool {
    if index < range || index + range >= candles.len() {
        return false;
    }
    let low = candles[index].low;
    (1..=range).all(|i| candles[index - i].low > low) && (1..=range).all(|i| candles[index + i].low >= low)
}

/// Indices (most recent last) of all confirmed pivot highs/lows within the
/// last `lookback` candles.
pub fn recent_pivots(candles: &[Candle], lookback: usize, range: usize) -> (Vec<usize>, Vec<usize>) {
    let start = candles.len().saturating_sub(lookback);
    let scan_end = candles.len().saturating_sub(range);
    let mut highs = Vec::new();
    let mut lows = Vec::new();
    for i in start..scan_end {
        if is_pivot_high(candles, i, range) {
            highs.push(i);
        }
        if is_pivot_low(candles, i, range) {
            lows.push(i);
        }
    }
    (highs, lows)
}
