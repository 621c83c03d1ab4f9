use serde::{Deserialize, Serialize};

/// Swing high/low over a lookback window — the min/max of that window's range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SwingPoints {
    pub swing_high: f64,
    pub swing_low: f64,
}
