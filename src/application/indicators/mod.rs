pub mod adx_atr;
pub mod builder;
pub mod candlestick;
pub mod ema;
pub mod rsi;
pub mod stoch_rsi;
pub mod swings;

pub use adx_atr::{adx, atr, atr_pct_state};
pub use builder::{build_indicators, classify_pullback, classify_trend};
pub use candlestick::{classify_candlestick_patterns, classify_wick};
pub use ema::{ema_last, ema_series};
pub use rsi::rsi_series;
pub use stoch_rsi::stoch_rsi;
pub use swings::{detect_swing_points, DEFAULT_SWING_LOOKBACK};
