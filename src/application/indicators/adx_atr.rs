use crate::domain::indicators::{TrendStrengthBlock, TrendStrengthCategory};
use crate::domain::market::Candle;

fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|w| {
            let (prev, cur) = (w[0], w[1]);
            let a = cur.high - cur.low;
            let b = (cur.high - prev.close).abs();
            let c = (cur.low - prev.close).abs();
            a.max(b).max(c)
        })
        .collect()
}

fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    if values.len() < period {
        return Vec::new();
    }
    let seed: f64 = values[..period].iter().sum();
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);
    let mut prev = seed;
    for &v in &values[period..] {
        let next = prev - prev / period as f64 + v;
        out.push(next);
        prev = next;
    }
    out
}

/// Average True Range over `period` candles. Requires `candles.len() >= period + 1`.
pub fn atr(candles: &[Candle], period: usize) -> Option<f64> {
    let tr = true_ranges(candles);
    if tr.len() < period {
        return None;
    }
    // Wilder's ATR is the smoothed *average*, not the running sum.
    let seed_avg: f64 = tr[..period].iter().sum::<f64>() / period as f64;
    let mut prev = seed_avg;
    for &v in &tr[period..] {
        prev = (prev * (period as f64 - 1.0) + v) / period as f64;
    }
    Some(prev)
}

/// Average Directional Index over `period` candles, with the categorical
/// trend-strength flags from the data model. Requires
/// `candles.len() >= 2 * period + 1` (DI smoothing, then DX smoothing).
pub fn adx(candles: &[Candle], period: usize) -> Option<TrendStrengthBlock> {
    if candles.len() < 2 * period + 1 {
        return None;
    }

    let mut plus_dm = Vec::with_capacity(candles.len() - 1);
    let mut minus_dm = Vec::with_capacity(candles.len() - 1);
    for w in candles.windows(2) {
        let up_move = w[1].high - w[0].high;
        let down_move = w[0].low - w[1].low;
        let plus = if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 };
        let minus = if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 };
        plus_dm.push(plus);
        minus_dm.push(minus);
    }
    let tr = true_ranges(candles);

    let smoothed_tr = wilder_smooth(&tr, period);
    let smoothed_plus = wilder_smooth(&plus_dm, period);
    let smoothed_minus = wilder_smooth(&minus_dm, period);

    let len = smoothed_tr.len().min(smoothed_plus.len()).min(smoothed_minus.len());
    if len == 0 {
        return None;
    }

    let dx: Vec<f64> = (0..len)
        .map(|i| {
            let tr_i = smoothed_tr[i];
            if tr_i == 0.0 {
                return 0.0;
            }
            let di_plus = 100.0 * smoothed_plus[i] / tr_i;
            let di_minus = 100.0 * smoothed_minus[i] / tr_i;
            let sum = di_plus + di_minus;
            if sum == 0.0 {
                0.0
            } else {
                100.0 * (di_plus - di_minus).abs() / sum
            }
        })
        .collect();

    if dx.len() < period {
        return None;
    }

    let adx_series = wilder_smooth(&dx, period);
    let adx_value = *adx_series.last()? / period as f64;

    Some(classify(adx_value))
}

fn classify(adx_value: f64) -> TrendStrengthBlock {
    let category = if adx_value >= 50.0 {
        TrendStrengthCategory::VeryStrong
    } else if adx_value >= 25.0 {
        TrendStrengthCategory::Strong
    } else if adx_value >= 20.0 {
        TrendStrengthCategory::Moderate
    } else {
        TrendStrengthCategory::Weak
    };

    TrendStrengthBlock {
        adx: adx_value,
        strong: matches!(category, TrendStrengthCategory::Strong | TrendStrengthCategory::VeryStrong),
        weak: matches!(category, TrendStrengthCategory::Weak),
        very_strong: matches!(category, TrendStrengthCategory::VeryStrong),
        category,
    }
}

/// Volatility classification thresholds. Used both by the per-interval
/// volatility field and by TREND_RIDER's maxAtrPct gate.
pub fn atr_pct_state(atr_pct: f64) -> crate::domain::signal::VolatilityState {
    use crate::domain::signal::VolatilityState::*;
    if atr_pct < 0.5 {
        Low
    } else if atr_pct < 1.5 {
        Normal
    } else if atr_pct < 3.0 {
        High
    } else {
        Extreme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(h: f64, l: f64, c: f64) -> Candle {
        Candle::new(0, (h + l) / 2.0, h, l, c, 100.0)
    }

    #[test]
    fn atr_needs_period_plus_one() {
        let candles = vec![candle(10.0, 9.0, 9.5); 10];
        assert!(atr(&candles, 14).is_none());
    }

    #[test]
    fn atr_on_constant_range() {
        let candles: Vec<Candle> = (0..20).map(|_| candle(10.0, 9.0, 9.5)).collect();
        let value = atr(&candles, 14).unwrap();
        assert!((value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn adx_needs_enough_candles() {
        let candles = vec![candle(10.0, 9.0, 9.5); 20];
        assert!(adx(&candles, 14).is_none());
    }

    #[test]
    fn volatility_thresholds() {
        assert!(matches!(atr_pct_state(0.2), crate::domain::signal::VolatilityState::Low));
        assert!(matches!(atr_pct_state(1.0), crate::domain::signal::VolatilityState::Normal));
        assert!(matches!(atr_pct_state(2.0), crate::domain::signal::VolatilityState::High));
        assert!(matches!(atr_pct_state(5.0), crate::domain::signal::VolatilityState::Extreme));
    }
}
