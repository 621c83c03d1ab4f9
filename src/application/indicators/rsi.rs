/// Wilder-smoothed RSI series. One value per candle from index `period`
/// onward; `None` if `closes.len() < period + 1`.
pub fn rsi_series(closes: &[f64], period: usize) -> Option<Vec<f64>> {
    if closes.len() < period + 1 {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for window in closes[..=period].windows(2) {
        let delta = window[1] - window[0];
        if delta >= 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }
    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;

    let mut out = Vec::with_capacity(closes.len() - period);
    out.push(rsi_from_averages(avg_gain, avg_loss));

    for window in closes[period..].windows(2) {
        let delta = window[1] - window[0];
        let (gain, loss) = if delta >= 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out.push(rsi_from_averages(avg_gain, avg_loss));
    }

    Some(out)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_period_plus_one_candles() {
        let closes = vec![1.0; 10];
        assert!(rsi_series(&closes, 14).is_none());
    }

    #[test]
    fn all_gains_saturates_to_100() {
        let closes: Vec<f64> = (0..20).map(|i| 1.0 + i as f64).collect();
        let series = rsi_series(&closes, 14).unwrap();
        assert!((series[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_has_no_losses_to_divide_by() {
        let closes = vec![10.0; 20];
        let series = rsi_series(&closes, 14).unwrap();
        // avg_loss == 0 with zero avg_gain too; the zero-division guard saturates to 100
        assert!((series[0] - 100.0).abs() < 1e-9);
    }
}
