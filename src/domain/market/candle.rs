use serde::{Deserialize, Serialize};

/// A single OHLCV candle. Ascending by `timestamp_ms` within a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// May be zero for sources that don't report volume.
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp_ms,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_and_body() {
        let c = Candle::new(0, 10.0, 12.0, 9.0, 11.0, 100.0);
        assert_eq!(c.range(), 3.0);
        assert_eq!(c.body(), 1.0);
        assert!(c.is_bullish());
    }

    #[test]
    fn wicks() {
        let c = Candle::new(0, 10.0, 12.0, 8.0, 9.0, 100.0);
        assert_eq!(c.upper_wick(), 2.0);
        assert_eq!(c.lower_wick(), 1.0);
    }
}
