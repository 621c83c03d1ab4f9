pub mod chart_features;
pub mod htf_bias;
pub mod indicators;
pub mod market_data;
pub mod pipeline;
pub mod strategies;
pub mod timeframe_analysis;
