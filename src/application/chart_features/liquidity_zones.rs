use super::fractals::{recent_pivots, FRACTAL_RANGE};
use crate::domain::chart_features::{LiquidityZone, LiquidityZoneType};
use crate::domain::market::Candle;

const LOOKBACK: usize = 50;
const EQUAL_TOLERANCE_PCT: f64 = 0.1;

/// Clusters of equal highs/lows within `EQUAL_TOLERANCE_PCT` of each other —
/// resting liquidity a price sweep is likely to target.
pub fn liquidity_zones(candles: &[Candle]) -> Vec<LiquidityZone> {
    let (high_idx, low_idx) = recent_pivots(candles, LOOKBACK, FRACTAL_RANGE);

    let mut zones = Vec::new();
    zones.extend(cluster(&high_idx, candles, |c| c.high, LiquidityZoneType::EqualHighs));
    zones.extend(cluster(&low_idx, candles, |c| c.low, LiquidityZoneType::EqualLows));
    zones
}

fn cluster(
    indices: &[usize],
    candles: &[Candle],
    level_of: impl Fn(&Candle) -> f64,
    zone_type: LiquidityZoneType,
) -> Vec<LiquidityZone> {
    let mut levels: Vec<f64> = indices.iter().map(|&i| level_of(&candles[i])).collect();
    levels.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut zones = Vec::new();
    let mut i = 0;
    while i < levels.len() {
        let anchor = levels[i];
        let mut count = 1;
        let mut j = i + 1;
        while j < levels.len() && (levels[j] - anchor).abs() / anchor * 100.0 <= EQUAL_TOLERANCE_PCT {
            count += 1;
            j += 1;
        }
        if count >= 2 {
            zones.push(LiquidityZone {
                r#type: zone_type,
                price: anchor,
                count,
            });
        }
        i = j;
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(h: f64, l: f64) -> Candle {
        Candle::new(0, (h + l) / 2.0, h, l, (h + l) / 2.0, 100.0)
    }

    #[test]
    fn no_pivots_gives_no_zones() {
        assert!(liquidity_zones(&[]).is_empty());
    }

    #[test]
    fn equal_highs_cluster_together() {
        let mut candles = Vec::new();
        for _ in 0..4 {
            candles.push(candle(100.0, 95.0));
        }
        candles.push(candle(110.0, 105.0));
        candles.push(candle(108.0, 103.0));
        candles.push(candle(107.0, 102.0));
        candles.push(candle(106.0, 101.0));
        candles.push(candle(110.05, 104.0));
        candles.push(candle(108.0, 103.0));
        candles.push(candle(107.0, 102.0));
        let zones = liquidity_zones(&candles);
        assert!(zones.iter().any(|z| z.r#type == LiquidityZoneType::EqualHighs));
    }
}
