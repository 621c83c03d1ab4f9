pub mod aggregator;
pub mod common;
pub mod micro_scalp;
pub mod normalizer;
pub mod router;
pub mod scalp_1h;
pub mod swing;
pub mod trend_4h;
pub mod trend_rider;

pub use aggregator::{evaluate_all_strategies, AggregateResult};
pub use router::evaluate_strategy;
