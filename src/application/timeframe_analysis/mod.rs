pub mod builder;

pub use builder::build_timeframe_analysis;
