use crate::domain::indicators::StochCondition;
use crate::domain::signal::{
    Confluence, Direction, EntryZone, HtfBias, RiskReward, SelectedStrategy, Signal, TimeframeAnalysis,
};

pub fn stoch_favors_long(c: StochCondition) -> bool {
    matches!(c, StochCondition::Bullish | StochCondition::Oversold)
}

pub fn stoch_favors_short(c: StochCondition) -> bool {
    matches!(c, StochCondition::Bearish | StochCondition::Overbought)
}

/// Builds a NO_TRADE signal carrying the evaluator's own gate failures as
/// `conditionsRequired`. Every evaluator funnels its early-return path
/// through this so the shape matches a passed-through normalizer result.
pub fn no_trade(
    strategy: SelectedStrategy,
    strategies_checked: Vec<SelectedStrategy>,
    conditions_required: Vec<String>,
    reason_summary: impl Into<String>,
    htf_bias: HtfBias,
    now_ms: i64,
) -> Signal {
    Signal {
        valid: false,
        direction: Direction::NoTrade,
        setup_type: crate::domain::signal::SetupType::Auto,
        selected_strategy: strategy,
        strategies_checked,
        confidence: 0,
        entry_zone: None,
        stop_loss: None,
        invalidation_level: None,
        targets: Vec::new(),
        risk_reward: RiskReward::none(),
        reason_summary: reason_summary.into(),
        confluence: Confluence::default(),
        conditions_required: if conditions_required.is_empty() {
            vec!["No qualifying setup".to_string()]
        } else {
            conditions_required
        },
        htf_bias,
        timestamp: now_ms,
    }
}

/// `"<x.xx>% from 4H 21 EMA"`, or the documented fallback phrase when the 4h
/// EMA21 isn't available. Used when composing human-readable reasons.
pub fn ema4h_distance_summary(tf4h: Option<&TimeframeAnalysis>) -> String {
    match tf4h.and_then(|tf| tf.indicators.ema.ema21) {
        Some(ema21) if ema21 != 0.0 => {
            let price = tf4h.unwrap().indicators.price.current;
            let pct = (price - ema21) / ema21 * 100.0;
            format!("{:.2}% from 4H 21 EMA", pct)
        }
        _ => "Awaiting price positioning data".to_string(),
    }
}

pub fn clamp_confidence(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

pub fn entry_zone(low: f64, high: f64) -> EntryZone {
    if low <= high {
        EntryZone { min: low, max: high }
    } else {
        EntryZone { min: high, max: low }
    }
}

pub fn risk_reward_for(targets: &[f64], entry_mid: f64, stop: f64) -> RiskReward {
    let risk = (entry_mid - stop).abs();
    if risk <= 0.0 {
        return RiskReward::none();
    }
    let rr = |t: f64| (t - entry_mid).abs() / risk;
    RiskReward {
        tp1_rr: targets.first().map(|&t| rr(t)).unwrap_or(0.0),
        tp2_rr: targets.get(1).map(|&t| rr(t)),
        tp3_rr: targets.get(2).map(|&t| rr(t)),
    }
}
