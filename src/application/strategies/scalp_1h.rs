use crate::domain::indicators::{PullbackState, Trend};
use crate::domain::signal::{
    BiasDirection, Confluence, Direction, EntryZone, HtfBias, SelectedStrategy, SetupType, Signal, TimeframeAnalysis,
};

use super::common::{clamp_confidence, entry_zone, no_trade, risk_reward_for, stoch_favors_long, stoch_favors_short};

const R_MULTIPLES: [f64; 2] = [1.5, 3.0];

pub fn evaluate_scalp_1h(
    tf1h: Option<&TimeframeAnalysis>,
    tf15m: Option<&TimeframeAnalysis>,
    tf5m: Option<&TimeframeAnalysis>,
    tf4h: Option<&TimeframeAnalysis>,
    htf_bias: HtfBias,
    now_ms: i64,
) -> Signal {
    let checked = vec![SelectedStrategy::Scalp1h];

    let (Some(tf1h), Some(tf15m)) = (tf1h, tf15m) else {
        return no_trade(
            SelectedStrategy::Scalp1h,
            checked,
            vec!["1H and 15m candle data are required".to_string()],
            "Insufficient 1H/15m data",
            htf_bias,
            now_ms,
        );
    };

    let trend1h = tf1h.indicators.analysis.trend;
    if trend1h == Trend::Flat {
        return no_trade(
            SelectedStrategy::Scalp1h,
            checked,
            vec!["1H trend must be directional".to_string()],
            "1H trend is FLAT",
            htf_bias,
            now_ms,
        );
    }
    let direction = if trend1h == Trend::Uptrend { Direction::Long } else { Direction::Short };

    let pullback_ok = |p: PullbackState| matches!(p, PullbackState::EntryZone | PullbackState::Retracing);
    if !pullback_ok(tf1h.indicators.analysis.pullback_state) || !pullback_ok(tf15m.indicators.analysis.pullback_state) {
        return no_trade(
            SelectedStrategy::Scalp1h,
            checked,
            vec!["1H and 15m pullback must be entry-zone or retracing".to_string()],
            "Pullback gate not met",
            htf_bias,
            now_ms,
        );
    }

    let (Some(ema21_1h), Some(ema21_15m)) = (tf1h.indicators.ema.ema21, tf15m.indicators.ema.ema21) else {
        return no_trade(
            SelectedStrategy::Scalp1h,
            checked,
            vec!["1H/15m EMA21 unavailable".to_string()],
            "Insufficient EMA history",
            htf_bias,
            now_ms,
        );
    };

    let price = tf1h.indicators.price.current;
    let within_1h = ema21_1h != 0.0 && ((price - ema21_1h) / ema21_1h * 100.0).abs() <= 2.0;
    let within_15m = ema21_15m != 0.0 && ((price - ema21_15m) / ema21_15m * 100.0).abs() <= 1.5;
    if !within_1h || !within_15m {
        return no_trade(
            SelectedStrategy::Scalp1h,
            checked,
            vec!["Price must sit within 2% of 1H EMA21 and 1.5% of 15m EMA21".to_string()],
            "Price outside EMA proximity bands",
            htf_bias,
            now_ms,
        );
    }

    let stoch_aligned = match direction {
        Direction::Long => stoch_favors_long(tf15m.indicators.stoch_rsi.condition),
        Direction::Short => stoch_favors_short(tf15m.indicators.stoch_rsi.condition),
        Direction::NoTrade => false,
    };
    if !stoch_aligned {
        return no_trade(
            SelectedStrategy::Scalp1h,
            checked,
            vec!["15m stochastic must align with 1H direction".to_string()],
            "15m momentum does not confirm",
            htf_bias,
            now_ms,
        );
    }

    let zone: EntryZone = if direction == Direction::Long {
        entry_zone(ema21_1h * 0.996, ema21_1h * 1.002)
    } else {
        entry_zone(ema21_1h * 0.998, ema21_1h * 1.004)
    };
    let entry_mid = (zone.min + zone.max) / 2.0;

    let stop = ltf_stop(tf5m, tf15m, tf4h, direction).unwrap_or(if direction == Direction::Long {
        entry_mid * 0.97
    } else {
        entry_mid * 1.03
    });

    let risk = (entry_mid - stop).abs();
    let sign = if direction == Direction::Long { 1.0 } else { -1.0 };
    let targets: Vec<f64> = R_MULTIPLES.iter().map(|r| entry_mid + sign * risk * r).collect();

    let confidence_base = if htf_bias.direction == bias_for(direction) { 60.0 + 0.2 * htf_bias.confidence as f64 } else { 60.0 };
    let confidence = clamp_confidence(confidence_base.min(85.0));

    Signal {
        valid: true,
        direction,
        setup_type: SetupType::Scalp,
        selected_strategy: SelectedStrategy::Scalp1h,
        strategies_checked: checked,
        confidence,
        entry_zone: Some(zone),
        stop_loss: Some(stop),
        invalidation_level: Some(stop),
        risk_reward: risk_reward_for(&targets, entry_mid, stop),
        targets,
        reason_summary: format!("1H scalp {} near EMA21 confluence", if direction == Direction::Long { "long" } else { "short" }),
        confluence: Confluence::default(),
        conditions_required: Vec::new(),
        htf_bias,
        timestamp: now_ms,
    }
}

fn bias_for(direction: Direction) -> BiasDirection {
    match direction {
        Direction::Long => BiasDirection::Long,
        Direction::Short => BiasDirection::Short,
        Direction::NoTrade => BiasDirection::Neutral,
    }
}

fn ltf_stop(tf5m: Option<&TimeframeAnalysis>, tf15m: &TimeframeAnalysis, tf4h: Option<&TimeframeAnalysis>, direction: Direction) -> Option<f64> {
    let candidates = [tf5m, Some(tf15m), tf4h];
    for tf in candidates.into_iter().flatten() {
        let level = if direction == Direction::Long { tf.structure.swing_low } else { tf.structure.swing_high };
        if level > 0.0 {
            return Some(level);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_is_no_trade() {
        let signal = evaluate_scalp_1h(None, None, None, None, HtfBias::default(), 0);
        assert!(!signal.valid);
    }
}
