use super::fractals::{recent_pivots, FRACTAL_RANGE};
use crate::domain::chart_features::{
    CurrentStructure, MarketStructure, StructureDirection, StructureEvent, StructureEventType,
};
use crate::domain::market::Candle;

const LOOKBACK: usize = 50;

/// Break-of-structure / change-of-character from the most recent confirmed
/// swing sequence. A BOS is a close beyond the last swing in the direction
/// of the prevailing structure; a CHOCH is a close beyond the last swing
/// against it.
pub fn market_structure(candles: &[Candle]) -> MarketStructure {
    if candles.len() < FRACTAL_RANGE * 2 + 2 {
        return MarketStructure::default();
    }

    let (highs, lows) = recent_pivots(candles, LOOKBACK, FRACTAL_RANGE);
    let current = candles.last().unwrap();

    let last_swing_high = highs.last().map(|&i| (i, candles[i].high));
    let last_swing_low = lows.last().map(|&i| (i, candles[i].low));

    // Infer prevailing structure from swing sequence: higher highs/lows -> up.
    let prevailing_up = match (highs.len(), lows.len()) {
        (h, l) if h >= 2 && l >= 2 => {
            candles[highs[h - 1]].high > candles[highs[h - 2]].high
                && candles[lows[l - 1]].low > candles[lows[l - 2]].low
        }
        _ => current.close > candles.first().unwrap().close,
    };

    let mut last_bos = None;
    let mut last_choch = None;

    if let Some((idx, level)) = last_swing_high {
        if current.close > level {
            let event = StructureEvent {
                r#type: if prevailing_up { StructureEventType::Bos } else { StructureEventType::Choch },
                direction: StructureDirection::Bullish,
                from_swing: level,
                to_swing: current.close,
                price: current.close,
                timestamp: current.timestamp_ms,
            };
            if prevailing_up {
                last_bos = Some(event);
            } else {
                last_choch = Some(event);
            }
            let _ = idx;
        }
    }

    if let Some((idx, level)) = last_swing_low {
        if current.close < level {
            let event = StructureEvent {
                r#type: if prevailing_up { StructureEventType::Choch } else { StructureEventType::Bos },
                direction: StructureDirection::Bearish,
                from_swing: level,
                to_swing: current.close,
                price: current.close,
                timestamp: current.timestamp_ms,
            };
            if prevailing_up {
                last_choch = Some(event);
            } else {
                last_bos = Some(event);
            }
            let _ = idx;
        }
    }

    let current_structure = if last_bos.is_some() || last_choch.is_some() {
        if current.close > candles.first().unwrap().close {
            Some(CurrentStructure::Uptrend)
        } else {
            Some(CurrentStructure::Downtrend)
        }
    } else if prevailing_up {
        Some(CurrentStructure::Uptrend)
    } else {
        Some(CurrentStructure::Flat)
    };

    MarketStructure {
        current_structure,
        last_bos,
        last_choch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(h: f64, l: f64, c: f64) -> Candle {
        Candle::new(0, (h + l) / 2.0, h, l, c, 100.0)
    }

    #[test]
    fn short_series_defaults() {
        assert_eq!(market_structure(&[]), MarketStructure::default());
    }

    #[test]
    fn detects_break_above_swing_high() {
        let mut candles = Vec::new();
        for i in 0..10 {
            let base = 100.0 + i as f64;
            candles.push(candle(base + 1.0, base - 1.0, base));
        }
        // pivot high
        candles.push(candle(115.0, 108.0, 110.0));
        candles.push(candle(112.0, 107.0, 109.0));
        candles.push(candle(111.0, 106.0, 108.0));
        candles.push(candle(110.0, 105.0, 107.0));
        // break above 115
        candles.push(candle(120.0, 115.0, 118.0));
        let ms = market_structure(&candles);
        assert!(ms.current_structure.is_some());
    }
}
