use crate::domain::chart_features::{AdvancedIndicators, BollingerBlock, MaStackBlock, VwapBlock, VwapPosition};
use crate::domain::market::{Candle, IntervalCode};

use crate::application::indicators::ema_last;

const VWAP_LOOKBACK: usize = 50;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_STDDEV: f64 = 2.0;

/// Bollinger Bands are only computed on 4h/1h/15m; other intervals leave the
/// slot `None` rather than emit a band that nothing downstream consults.
fn bollinger_eligible(interval: IntervalCode) -> bool {
    matches!(interval, IntervalCode::FourHour | IntervalCode::OneHour | IntervalCode::FifteenMin)
}

/// MA-stack alignment (21/50/200 EMA) is only meaningful on 4h/1h.
fn ma_stack_eligible(interval: IntervalCode) -> bool {
    matches!(interval, IntervalCode::FourHour | IntervalCode::OneHour)
}

pub fn advanced_indicators(candles: &[Candle], interval: IntervalCode) -> AdvancedIndicators {
    AdvancedIndicators {
        vwap: interval.is_intraday().then(|| vwap_block(candles)).flatten(),
        bollinger: bollinger_eligible(interval).then(|| bollinger_block(candles)).flatten(),
        ma_stack: ma_stack_eligible(interval).then(|| ma_stack_block(candles)).flatten(),
    }
}

fn vwap_block(candles: &[Candle]) -> Option<VwapBlock> {
    let current = candles.last()?;
    let start = candles.len().saturating_sub(VWAP_LOOKBACK);
    let window = &candles[start..];

    let mut pv = 0.0;
    let mut volume = 0.0;
    for c in window {
        let typical = (c.high + c.low + c.close) / 3.0;
        pv += typical * c.volume;
        volume += c.volume;
    }
    if volume <= 0.0 {
        return None;
    }
    let vwap = pv / volume;
    let distance_pct = (current.close - vwap) / vwap * 100.0;
    let position = if distance_pct.abs() < 0.05 {
        VwapPosition::At
    } else if distance_pct > 0.0 {
        VwapPosition::Above
    } else {
        VwapPosition::Below
    };

    Some(VwapBlock { vwap, position, distance_pct })
}

fn bollinger_block(candles: &[Candle]) -> Option<BollingerBlock> {
    if candles.len() < BOLLINGER_PERIOD {
        return None;
    }
    let window = &candles[candles.len() - BOLLINGER_PERIOD..];
    let closes: Vec<f64> = window.iter().map(|c| c.close).collect();
    let mean = closes.iter().sum::<f64>() / closes.len() as f64;
    let variance = closes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / closes.len() as f64;
    let stddev = variance.sqrt();

    let upper = mean + BOLLINGER_STDDEV * stddev;
    let lower = mean - BOLLINGER_STDDEV * stddev;
    let bandwidth_pct = if mean != 0.0 { (upper - lower) / mean * 100.0 } else { 0.0 };

    Some(BollingerBlock {
        upper,
        middle: mean,
        lower,
        bandwidth_pct,
        squeeze: bandwidth_pct < 4.0,
    })
}

fn ma_stack_block(candles: &[Candle]) -> Option<MaStackBlock> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let ma21 = ema_last(&closes, 21)?;
    let ma50 = ema_last(&closes, 50)?;
    let ma200 = ema_last(&closes, 200)?;

    let bull_stack = ma21 > ma50 && ma50 > ma200;
    let bear_stack = ma21 < ma50 && ma50 < ma200;

    Some(MaStackBlock {
        ma21,
        ma50,
        ma200,
        bull_stack,
        bear_stack,
        flat_stack: !bull_stack && !bear_stack,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(c: f64, v: f64) -> Candle {
        Candle::new(0, c, c + 0.5, c - 0.5, c, v)
    }

    #[test]
    fn vwap_none_on_empty_series() {
        assert!(vwap_block(&[]).is_none());
    }

    #[test]
    fn bollinger_none_below_period() {
        let candles: Vec<Candle> = (0..10).map(|i| candle(100.0 + i as f64, 10.0)).collect();
        assert!(bollinger_block(&candles).is_none());
    }

    #[test]
    fn ma_stack_none_below_200_candles() {
        let candles: Vec<Candle> = (0..50).map(|i| candle(100.0 + i as f64, 10.0)).collect();
        assert!(ma_stack_block(&candles).is_none());
    }

    #[test]
    fn daily_interval_suppresses_vwap_and_ma_stack() {
        let candles: Vec<Candle> = (0..250).map(|i| candle(100.0 + i as f64 * 0.01, 10.0)).collect();
        let advanced = advanced_indicators(&candles, IntervalCode::OneDay);
        assert!(advanced.vwap.is_none());
        assert!(advanced.ma_stack.is_none());
        assert!(advanced.bollinger.is_none());
    }

    #[test]
    fn one_hour_interval_computes_all_blocks() {
        let candles: Vec<Candle> = (0..250).map(|i| candle(100.0 + (i as f64 * 0.1).sin() * 5.0, 10.0)).collect();
        let advanced = advanced_indicators(&candles, IntervalCode::OneHour);
        assert!(advanced.vwap.is_some());
        assert!(advanced.ma_stack.is_some());
        assert!(advanced.bollinger.is_some());
    }
}
