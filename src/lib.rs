//! Multi-timeframe OHLCV analysis and rule-based trade signal engine.
//!
//! The crate is organized the same way it's evaluated: pure `domain` types,
//! an `application` layer of stateless pipeline stages (market data fallback,
//! indicators, chart features, HTF bias, strategy engine), `infrastructure`
//! adapters for the outside world, and a thin `interfaces::http` surface.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
