use thiserror::Error;

/// Malformed request input: unknown symbol, bad interval list, out-of-range
/// numeric parameter. Surfaced as 4xx at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("Unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("Invalid interval list '{raw}': {reason}")]
    InvalidIntervals { raw: String, reason: String },

    #[error("Invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

/// Any failure of a candle/ticker fetch. Recovered per-interval by the
/// primary -> secondary -> synthetic fallback chain; this is only
/// constructed when every option in that chain has been exhausted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("Primary source failed for {symbol}/{interval}: {reason}")]
    PrimaryFailed {
        symbol: String,
        interval: String,
        reason: String,
    },

    #[error("Secondary source failed for {symbol}/{interval}: {reason}")]
    SecondaryFailed {
        symbol: String,
        interval: String,
        reason: String,
    },

    #[error("All sources exhausted for {symbol}/{interval}")]
    AllSourcesExhausted { symbol: String, interval: String },

    #[error("Request to upstream timed out after {deadline_ms}ms")]
    Timeout { deadline_ms: u64 },
}

/// Not enough candles to compute a specific indicator. Local to the
/// indicator function: the field becomes `None`, sibling fields are
/// unaffected.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Insufficient data for {indicator}: need >= {required}, have {available}")]
pub struct InsufficientDataError {
    pub indicator: String,
    pub required: usize,
    pub available: usize,
}

/// Unexpected failure inside a strategy evaluator. Caught per-evaluator and
/// turned into a NO_TRADE signal carrying this message as `reason_summary`;
/// never propagates to crash the aggregator.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Evaluator {strategy} failed: {reason}")]
pub struct EvaluatorError {
    pub strategy: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_unknown_symbol() {
        let err = InputError::UnknownSymbol {
            symbol: "DOGEUSD".to_string(),
        };
        assert!(err.to_string().contains("DOGEUSD"));
    }

    #[test]
    fn formats_evaluator_error() {
        let err = EvaluatorError {
            strategy: "SWING".to_string(),
            reason: "missing 3d data".to_string(),
        };
        assert_eq!(err.to_string(), "Evaluator SWING failed: missing 3d data");
    }
}
