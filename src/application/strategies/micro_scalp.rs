use crate::domain::indicators::{PullbackState, Trend};
use crate::domain::signal::{Confluence, Direction, EntryZone, HtfBias, SelectedStrategy, SetupType, Signal, TimeframeAnalysis};

use super::common::{clamp_confidence, entry_zone, no_trade, risk_reward_for};

const R_MULTIPLES: [f64; 2] = [1.0, 1.5];
const TIGHT_PROXIMITY_PCT: f64 = 0.25;

/// Independent micro-scalp evaluator. 4h is disregarded by design — the
/// aggregator's SAFE 4H-FLAT gate still blocks this slot regardless.
pub fn evaluate_micro_scalp(
    tf1h: Option<&TimeframeAnalysis>,
    tf15m: Option<&TimeframeAnalysis>,
    tf5m: Option<&TimeframeAnalysis>,
    htf_bias: HtfBias,
    now_ms: i64,
) -> Signal {
    let checked = vec![SelectedStrategy::MicroScalp];

    let (Some(tf1h), Some(tf15m), Some(tf5m)) = (tf1h, tf15m, tf5m) else {
        return no_trade(
            SelectedStrategy::MicroScalp,
            checked,
            vec!["1H, 15m and 5m candle data are required".to_string()],
            "Insufficient LTF data",
            htf_bias,
            now_ms,
        );
    };

    let trend1h = tf1h.indicators.analysis.trend;
    if trend1h == Trend::Flat || !matches!(tf1h.indicators.analysis.pullback_state, PullbackState::EntryZone | PullbackState::Retracing) {
        return no_trade(
            SelectedStrategy::MicroScalp,
            checked,
            vec!["1H trend must be directional with entry-zone/retracing pullback".to_string()],
            "1H gate not met",
            htf_bias,
            now_ms,
        );
    }
    let direction = if trend1h == Trend::Uptrend { Direction::Long } else { Direction::Short };

    let (Some(ema21_15m), Some(ema21_5m)) = (tf15m.indicators.ema.ema21, tf5m.indicators.ema.ema21) else {
        return no_trade(
            SelectedStrategy::MicroScalp,
            checked,
            vec!["15m/5m EMA21 unavailable".to_string()],
            "Insufficient EMA history",
            htf_bias,
            now_ms,
        );
    };

    let tight = |tf: &TimeframeAnalysis, ema: f64| ema != 0.0 && ((tf.indicators.price.current - ema) / ema * 100.0).abs() <= TIGHT_PROXIMITY_PCT;
    let both_tight = tight(tf15m, ema21_15m) && tight(tf5m, ema21_5m);

    let pullback_ok = |p: PullbackState| matches!(p, PullbackState::EntryZone | PullbackState::Retracing);
    let both_pullback_ok = pullback_ok(tf15m.indicators.analysis.pullback_state) && pullback_ok(tf5m.indicators.analysis.pullback_state);

    let stoch_aligned = |k: f64| if direction == Direction::Long { k < 40.0 } else { k > 60.0 };
    let stoch_strong = |k: f64| if direction == Direction::Long { k < 25.0 } else { k > 75.0 };
    let both_aligned = stoch_aligned(tf15m.indicators.stoch_rsi.k) && stoch_aligned(tf5m.indicators.stoch_rsi.k);
    let both_strong = stoch_strong(tf15m.indicators.stoch_rsi.k) && stoch_strong(tf5m.indicators.stoch_rsi.k);

    if !both_tight || !both_pullback_ok || !both_aligned {
        return no_trade(
            SelectedStrategy::MicroScalp,
            checked,
            vec!["15m and 5m must be tight to EMA21 with aligned stochastics".to_string()],
            "Tight confluence gate not met",
            htf_bias,
            now_ms,
        );
    }

    let mid = (ema21_15m + ema21_5m) / 2.0;
    let zone: EntryZone = entry_zone(mid * 0.999, mid * 1.001);
    let entry_mid = (zone.min + zone.max) / 2.0;

    let stop = if direction == Direction::Long {
        tf15m.structure.swing_low.min(tf5m.structure.swing_low)
    } else {
        tf15m.structure.swing_high.max(tf5m.structure.swing_high)
    };

    let risk = (entry_mid - stop).abs();
    let sign = if direction == Direction::Long { 1.0 } else { -1.0 };
    let targets: Vec<f64> = R_MULTIPLES.iter().map(|r| entry_mid + sign * risk * r).collect();

    let mut confidence: f64 = 60.0;
    confidence += if both_strong { 10.0 } else { 5.0 };
    if both_aligned {
        confidence += 5.0;
    }
    let confidence = clamp_confidence(confidence.clamp(60.0, 75.0));

    Signal {
        valid: true,
        direction,
        setup_type: SetupType::MicroScalp,
        selected_strategy: SelectedStrategy::MicroScalp,
        strategies_checked: checked,
        confidence,
        entry_zone: Some(zone),
        stop_loss: Some(stop),
        invalidation_level: Some(stop),
        risk_reward: risk_reward_for(&targets, entry_mid, stop),
        targets,
        reason_summary: format!("Micro-scalp {} on tight 15m/5m confluence", if direction == Direction::Long { "long" } else { "short" }),
        confluence: Confluence::default(),
        conditions_required: Vec::new(),
        htf_bias,
        timestamp: now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_is_no_trade() {
        let signal = evaluate_micro_scalp(None, None, None, HtfBias::default(), 0);
        assert!(!signal.valid);
    }
}
