/// Exponential moving average, seeded by the period-length simple moving
/// average. Returns one value per input candle from the seed point onward
/// (so the returned history is `closes.len() - period + 1` long), or `None`
/// when `closes.len() < period`.
pub fn ema_series(closes: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let seed: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut out = Vec::with_capacity(closes.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for &close in &closes[period..] {
        let next = (close - prev) * multiplier + prev;
        out.push(next);
        prev = next;
    }

    Some(out)
}

/// Convenience wrapper returning only the most recent EMA value.
pub fn ema_last(closes: &[f64], period: usize) -> Option<f64> {
    ema_series(closes, period).and_then(|s| s.last().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_with_sma() {
        let closes = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let series = ema_series(&closes, 5).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0], 3.0);
    }

    #[test]
    fn too_short_is_none() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(ema_series(&closes, 5).is_none());
    }

    #[test]
    fn smooths_subsequent_closes() {
        let closes = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let series = ema_series(&closes, 5).unwrap();
        assert_eq!(series.len(), 2);
        // multiplier = 2/6 = 0.3333...; seed = 3.0; next = (6-3)*0.3333+3
        let expected = (6.0 - 3.0) * (2.0 / 6.0) + 3.0;
        assert!((series[1] - expected).abs() < 1e-9);
    }

    #[test]
    fn exactly_at_minimum_length() {
        let closes = vec![2.0; 21];
        assert!(ema_series(&closes, 21).is_some());
    }
}
