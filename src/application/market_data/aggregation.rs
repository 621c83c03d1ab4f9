use crate::domain::market::Candle;

/// Reduces `candles` into fixed-size contiguous chunks of `chunk_size`,
/// each chunk becoming one synthetic higher-timeframe candle:
/// `{first.open, max(high), min(low), last.close, sum(volume), first.timestamp}`.
/// A trailing partial chunk is dropped — it doesn't represent
/// a closed higher-timeframe bar yet.
pub fn aggregate_candles(candles: &[Candle], chunk_size: usize) -> Vec<Candle> {
    if chunk_size == 0 {
        return Vec::new();
    }

    candles
        .chunks(chunk_size)
        .filter(|chunk| chunk.len() == chunk_size)
        .map(|chunk| {
            let first = chunk[0];
            let last = chunk[chunk.len() - 1];
            let high = chunk.iter().fold(f64::MIN, |acc, c| acc.max(c.high));
            let low = chunk.iter().fold(f64::MAX, |acc, c| acc.min(c.low));
            let volume: f64 = chunk.iter().map(|c| c.volume).sum();
            Candle::new(first.timestamp_ms, first.open, high, low, last.close, volume)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle::new(i, open, high, low, close, volume)
    }

    #[test]
    fn reduces_three_candle_chunks() {
        let candles = vec![
            candle(0, 10.0, 12.0, 9.0, 11.0, 100.0),
            candle(1, 11.0, 13.0, 10.0, 12.0, 150.0),
            candle(2, 12.0, 14.0, 11.0, 13.0, 200.0),
            candle(3, 13.0, 15.0, 12.0, 14.0, 50.0),
            candle(4, 14.0, 16.0, 13.0, 15.0, 60.0),
            candle(5, 15.0, 17.0, 14.0, 16.0, 70.0),
        ];

        let aggregated = aggregate_candles(&candles, 3);
        assert_eq!(aggregated.len(), 2);

        let first = aggregated[0];
        assert_eq!(first.timestamp_ms, 0);
        assert_eq!(first.open, 10.0);
        assert_eq!(first.high, 14.0);
        assert_eq!(first.low, 9.0);
        assert_eq!(first.close, 13.0);
        assert_eq!(first.volume, 450.0);

        let second = aggregated[1];
        assert_eq!(second.timestamp_ms, 3);
        assert_eq!(second.close, 16.0);
        assert_eq!(second.volume, 180.0);
    }

    #[test]
    fn drops_trailing_partial_chunk() {
        let candles = vec![
            candle(0, 1.0, 1.0, 1.0, 1.0, 1.0),
            candle(1, 1.0, 1.0, 1.0, 1.0, 1.0),
        ];
        assert!(aggregate_candles(&candles, 3).is_empty());
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(aggregate_candles(&[], 3).is_empty());
    }
}
