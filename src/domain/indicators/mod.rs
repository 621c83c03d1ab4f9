pub mod types;

pub use types::{
    AnalysisBlock, CandlestickPatterns, EmaBlock, Indicators, Metadata, PriceBlock,
    PullbackState, RsiBlock, StochCondition, StochRsiBlock, StochRsiWithHistory, Trend,
    TrendStrengthBlock, TrendStrengthCategory, WickAnalysis,
};
