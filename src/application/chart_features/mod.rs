pub mod advanced;
pub mod anatomy;
pub mod builder;
pub mod divergences;
pub mod fair_value_gaps;
pub mod fractals;
pub mod liquidity_zones;
pub mod market_structure;
pub mod price_action;
pub mod support_resistance;
pub mod volume_profile;

pub use builder::build_chart_features;
