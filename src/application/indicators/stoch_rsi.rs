use super::rsi::rsi_series;
use crate::domain::indicators::{StochCondition, StochRsiWithHistory};

const RSI_PERIOD: usize = 14;
const STOCH_PERIOD: usize = 14;
const SMOOTH_PERIOD: usize = 3;

/// RSI(14) -> stochastic(14) on RSI -> k = SMA(3), d = SMA(3, k).
/// Requires `closes.len() >= RSI_PERIOD + STOCH_PERIOD`.
pub fn stoch_rsi(closes: &[f64]) -> Option<StochRsiWithHistory> {
    if closes.len() < RSI_PERIOD + STOCH_PERIOD {
        return None;
    }

    let rsi = rsi_series(closes, RSI_PERIOD)?;
    if rsi.len() < STOCH_PERIOD {
        return None;
    }

    let stoch: Vec<f64> = (STOCH_PERIOD - 1..rsi.len())
        .map(|i| {
            let window = &rsi[i + 1 - STOCH_PERIOD..=i];
            let min = window.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if (max - min).abs() < f64::EPSILON {
                0.0
            } else {
                (rsi[i] - min) / (max - min) * 100.0
            }
        })
        .collect();

    let k_series = sma_series(&stoch, SMOOTH_PERIOD);
    if k_series.is_empty() {
        return None;
    }
    let d_series = sma_series(&k_series, SMOOTH_PERIOD);

    let k = clamp_pct(*k_series.last().unwrap());
    let d = clamp_pct(*d_series.last().unwrap_or(&k));

    let condition = classify(k, d);

    Some(StochRsiWithHistory {
        k,
        d,
        condition,
        history: k_series.iter().map(|v| clamp_pct(*v)).collect(),
    })
}

fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    if values.len() < period {
        return Vec::new();
    }
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}

fn clamp_pct(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

fn classify(k: f64, d: f64) -> StochCondition {
    if k < 20.0 {
        StochCondition::Oversold
    } else if k > 80.0 {
        StochCondition::Overbought
    } else if k > d {
        StochCondition::Bullish
    } else if k < d {
        StochCondition::Bearish
    } else {
        StochCondition::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_is_none() {
        let closes = vec![1.0; 20];
        assert!(stoch_rsi(&closes).is_none());
    }

    #[test]
    fn clamped_to_0_100() {
        let closes: Vec<f64> = (0..40).map(|i| 1.0 + i as f64 * 0.1).collect();
        let result = stoch_rsi(&closes).unwrap();
        assert!((0.0..=100.0).contains(&result.k));
        assert!((0.0..=100.0).contains(&result.d));
    }

    #[test]
    fn constant_series_has_no_spread() {
        let closes = vec![10.0; 40];
        let result = stoch_rsi(&closes).unwrap();
        assert_eq!(result.k, 0.0);
    }
}
