use crate::domain::chart_features::{Divergence, DivergenceIndicator, DivergenceType, StructureDirection};
use crate::domain::indicators::Indicators;
use crate::domain::market::Candle;

use super::fractals::{recent_pivots, FRACTAL_RANGE};

const LOOKBACK: usize = 50;

/// Compares the last two confirmed price swings against the oscillator value
/// at those same candles. Regular divergence: price makes a new extreme the
/// oscillator doesn't confirm. Hidden divergence: price fails to make a new
/// extreme but the oscillator does.
pub fn divergences(candles: &[Candle], indicators: &Indicators) -> Vec<Divergence> {
    let mut out = Vec::new();
    let (highs, lows) = recent_pivots(candles, LOOKBACK, FRACTAL_RANGE);

    if let Some(rsi) = &indicators.rsi {
        out.extend(scan(candles, &highs, &lows, &rsi.history, DivergenceIndicator::Rsi));
    }
    out.extend(scan(
        candles,
        &highs,
        &lows,
        &indicators.stoch_rsi.history,
        DivergenceIndicator::StochRsi,
    ));
    out
}

fn scan(
    candles: &[Candle],
    highs: &[usize],
    lows: &[usize],
    osc_history: &[f64],
    indicator: DivergenceIndicator,
) -> Vec<Divergence> {
    let mut out = Vec::new();
    let osc_at = |i: usize| -> Option<f64> {
        let offset = candles.len().checked_sub(osc_history.len())?;
        i.checked_sub(offset).and_then(|j| osc_history.get(j)).copied()
    };

    if highs.len() >= 2 {
        let (a, b) = (highs[highs.len() - 2], highs[highs.len() - 1]);
        if let (Some(oa), Some(ob)) = (osc_at(a), osc_at(b)) {
            if candles[b].high > candles[a].high && ob < oa {
                out.push(Divergence {
                    side: StructureDirection::Bearish,
                    r#type: DivergenceType::Regular,
                    indicator,
                });
            } else if candles[b].high < candles[a].high && ob > oa {
                out.push(Divergence {
                    side: StructureDirection::Bearish,
                    r#type: DivergenceType::Hidden,
                    indicator,
                });
            }
        }
    }

    if lows.len() >= 2 {
        let (a, b) = (lows[lows.len() - 2], lows[lows.len() - 1]);
        if let (Some(oa), Some(ob)) = (osc_at(a), osc_at(b)) {
            if candles[b].low < candles[a].low && ob > oa {
                out.push(Divergence {
                    side: StructureDirection::Bullish,
                    r#type: DivergenceType::Regular,
                    indicator,
                });
            } else if candles[b].low > candles[a].low && ob < oa {
                out.push(Divergence {
                    side: StructureDirection::Bullish,
                    r#type: DivergenceType::Hidden,
                    indicator,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::indicators::build_indicators;

    fn candle(h: f64, l: f64, c: f64) -> Candle {
        Candle::new(0, (h + l) / 2.0, h, l, c, 100.0)
    }

    #[test]
    fn short_series_has_no_divergences() {
        let candles = vec![candle(10.0, 9.0, 9.5)];
        let indicators = build_indicators(&candles);
        assert!(divergences(&candles, &indicators).is_empty());
    }

    #[test]
    fn no_panics_on_flat_series() {
        let candles = vec![candle(10.0, 9.0, 9.5); 40];
        let indicators = build_indicators(&candles);
        let divs = divergences(&candles, &indicators);
        assert!(divs.is_empty());
    }
}
