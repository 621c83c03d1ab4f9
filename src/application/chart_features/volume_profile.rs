use crate::domain::chart_features::VolumeProfile;
use crate::domain::market::Candle;

const LOOKBACK: usize = 50;
const BUCKETS: usize = 20;
const VALUE_AREA_PCT: f64 = 0.70;

/// Buckets traded volume across the price range of the lookback window and
/// reports high/low volume nodes plus the 70% value area, the way a volume
/// profile study would on a chart.
pub fn volume_profile(candles: &[Candle]) -> VolumeProfile {
    let start = candles.len().saturating_sub(LOOKBACK);
    let window = &candles[start..];
    if window.len() < 2 {
        return VolumeProfile::default();
    }

    let lo = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let hi = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    if !(hi > lo) {
        return VolumeProfile::default();
    }

    let bucket_size = (hi - lo) / BUCKETS as f64;
    let mut volumes = vec![0.0_f64; BUCKETS];
    for c in window {
        let mid = (c.high + c.low) / 2.0;
        let idx = (((mid - lo) / bucket_size) as usize).min(BUCKETS - 1);
        volumes[idx] += c.volume;
    }

    let total: f64 = volumes.iter().sum();
    if total <= 0.0 {
        return VolumeProfile::default();
    }

    let mean = total / BUCKETS as f64;
    let bucket_price = |i: usize| lo + bucket_size * (i as f64 + 0.5);

    let high_volume_nodes = volumes
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > mean * 1.5)
        .map(|(i, _)| bucket_price(i))
        .collect();
    let low_volume_nodes = volumes
        .iter()
        .enumerate()
        .filter(|(_, &v)| v < mean * 0.5)
        .map(|(i, _)| bucket_price(i))
        .collect();

    // Value area: expand outward from the point of control until 70% of
    // volume is enclosed.
    let poc = volumes
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut lo_idx = poc;
    let mut hi_idx = poc;
    let mut enclosed = volumes[poc];
    let target = total * VALUE_AREA_PCT;
    while enclosed < target && (lo_idx > 0 || hi_idx < BUCKETS - 1) {
        let expand_low = lo_idx > 0 && (hi_idx >= BUCKETS - 1 || volumes[lo_idx - 1] >= volumes[hi_idx + 1]);
        if expand_low {
            lo_idx -= 1;
            enclosed += volumes[lo_idx];
        } else {
            hi_idx += 1;
            enclosed += volumes[hi_idx];
        }
    }

    VolumeProfile {
        high_volume_nodes,
        low_volume_nodes,
        value_area_high: Some(bucket_price(hi_idx)),
        value_area_low: Some(bucket_price(lo_idx)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(h: f64, l: f64, v: f64) -> Candle {
        Candle::new(0, (h + l) / 2.0, h, l, (h + l) / 2.0, v)
    }

    #[test]
    fn short_series_defaults() {
        assert_eq!(volume_profile(&[candle(1.0, 0.5, 10.0)]), VolumeProfile::default());
    }

    #[test]
    fn value_area_brackets_point_of_control() {
        let mut candles = vec![candle(100.0, 90.0, 10.0); 30];
        candles.push(candle(105.0, 95.0, 500.0));
        let vp = volume_profile(&candles);
        assert!(vp.value_area_high.is_some());
        assert!(vp.value_area_low.is_some());
    }
}
