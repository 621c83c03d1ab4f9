use super::fractals::{is_pivot_high, is_pivot_low, FRACTAL_RANGE};
use crate::domain::chart_features::SupportResistance;
use crate::domain::market::{Candle, IntervalCode};

const LOOKBACK: usize = 50;
const PROXIMITY_PCT: f64 = 0.5;

/// Nearest pivot high above / pivot low below the current price, from a
/// recent lookback window. Only computed for 4h/1h; other intervals get the
/// empty default.
pub fn support_resistance(candles: &[Candle], interval: IntervalCode) -> SupportResistance {
    if !matches!(interval, IntervalCode::FourHour | IntervalCode::OneHour) {
        return SupportResistance::default();
    }
    let Some(current) = candles.last() else {
        return SupportResistance::default();
    };
    let price = current.close;

    let start = candles.len().saturating_sub(LOOKBACK);
    let scan_end = candles.len().saturating_sub(FRACTAL_RANGE);

    let mut resistance: Option<f64> = None;
    let mut support: Option<f64> = None;

    for i in start..scan_end {
        if is_pivot_high(candles, i, FRACTAL_RANGE) && candles[i].high > price {
            resistance = Some(resistance.map_or(candles[i].high, |r| r.min(candles[i].high)));
        }
        if is_pivot_low(candles, i, FRACTAL_RANGE) && candles[i].low < price {
            support = Some(support.map_or(candles[i].low, |s| s.max(candles[i].low)));
        }
    }

    let at_resistance = resistance.is_some_and(|r| (r - price).abs() / r * 100.0 <= PROXIMITY_PCT);
    let at_support = support.is_some_and(|s| (price - s).abs() / s * 100.0 <= PROXIMITY_PCT);

    let prev_close = (candles.len() >= 2).then(|| candles[candles.len() - 2].close);
    let broke_resistance_on_close =
        resistance.zip(prev_close).is_some_and(|(r, prev)| prev <= r && price > r);
    let broke_support_on_close = support.zip(prev_close).is_some_and(|(s, prev)| prev >= s && price < s);

    SupportResistance {
        resistance,
        support,
        at_resistance,
        at_support,
        broke_resistance_on_close,
        broke_support_on_close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(h: f64, l: f64, c: f64) -> Candle {
        Candle::new(0, (h + l) / 2.0, h, l, c, 100.0)
    }

    #[test]
    fn empty_series_defaults() {
        assert_eq!(support_resistance(&[], IntervalCode::OneHour), SupportResistance::default());
    }

    #[test]
    fn finds_nearest_resistance_above_price() {
        let mut candles = vec![candle(100.0, 95.0, 98.0); 10];
        // pivot high at index 10
        candles.push(candle(90.0, 85.0, 88.0));
        candles.push(candle(92.0, 87.0, 90.0));
        candles.push(candle(105.0, 100.0, 102.0)); // pivot high
        candles.push(candle(95.0, 90.0, 92.0));
        candles.push(candle(93.0, 88.0, 90.0));
        candles.push(candle(94.0, 89.0, 91.0));
        let sr = support_resistance(&candles, IntervalCode::OneHour);
        assert!(sr.resistance.is_some());
    }

    #[test]
    fn ineligible_interval_returns_default_regardless_of_candles() {
        let mut candles = vec![candle(100.0, 95.0, 98.0); 10];
        candles.push(candle(105.0, 100.0, 102.0));
        assert_eq!(support_resistance(&candles, IntervalCode::FifteenMin), SupportResistance::default());
    }
}
