use crate::domain::indicators::Trend;
use crate::domain::market::IntervalCode;
use crate::domain::signal::{BiasDirection, Direction, EntryZone, HtfBias, Mode, SelectedStrategy, Signal, StrategySignals, TimeframeMap};

use super::common::{entry_zone, no_trade, risk_reward_for};
use super::micro_scalp::evaluate_micro_scalp;
use super::normalizer::normalize;
use super::router::evaluate_trend_rider_strategy;
use super::scalp_1h::evaluate_scalp_1h;
use super::swing::evaluate_swing;
use super::trend_4h::evaluate_trend_4h;

pub struct AggregateResult {
    pub strategies: StrategySignals,
    pub best_signal: Option<SelectedStrategy>,
    pub override_used: bool,
    pub override_notes: Vec<String>,
}

const SAFE_PRIORITY: [SelectedStrategy; 4] =
    [SelectedStrategy::Trend4h, SelectedStrategy::Swing, SelectedStrategy::Scalp1h, SelectedStrategy::MicroScalp];
const AGGRESSIVE_PRIORITY: [SelectedStrategy; 4] =
    [SelectedStrategy::Trend4h, SelectedStrategy::Scalp1h, SelectedStrategy::MicroScalp, SelectedStrategy::Swing];
const FORCE_PRIORITY: [SelectedStrategy; 3] = [SelectedStrategy::Trend4h, SelectedStrategy::Scalp1h, SelectedStrategy::MicroScalp];

/// Runs all five evaluators for one symbol under one mode. Every result
/// passes the normalizer so the returned shape is canonical regardless of
/// `valid`.
pub fn evaluate_all_strategies(timeframes: &TimeframeMap, mode: Mode, htf_bias: HtfBias, now_ms: i64) -> AggregateResult {
    let trend4h = timeframes.get(IntervalCode::FourHour).map(|a| a.indicators.analysis.trend).unwrap_or(Trend::Flat);

    if mode == Mode::Safe && trend4h == Trend::Flat {
        let checked = vec![
            SelectedStrategy::Swing,
            SelectedStrategy::Trend4h,
            SelectedStrategy::Scalp1h,
            SelectedStrategy::MicroScalp,
            SelectedStrategy::TrendRider,
        ];
        let reason = "4H trend is FLAT — no trade allowed per SAFE rules";
        let flat_signal = |s: SelectedStrategy| no_trade(s, checked.clone(), vec![reason.to_string()], reason, htf_bias, now_ms);

        return AggregateResult {
            strategies: StrategySignals {
                swing: flat_signal(SelectedStrategy::Swing),
                trend_4h: flat_signal(SelectedStrategy::Trend4h),
                scalp_1h: flat_signal(SelectedStrategy::Scalp1h),
                micro_scalp: flat_signal(SelectedStrategy::MicroScalp),
                trend_rider: flat_signal(SelectedStrategy::TrendRider),
            },
            best_signal: None,
            override_used: false,
            override_notes: Vec::new(),
        };
    }

    let get = |i: IntervalCode| timeframes.get(i);

    let mut swing = normalize(evaluate_swing(get(IntervalCode::ThreeDay), get(IntervalCode::OneDay), get(IntervalCode::FourHour), htf_bias, now_ms), htf_bias);
    let mut trend_4h = normalize(
        evaluate_trend_4h(get(IntervalCode::FourHour), get(IntervalCode::OneHour), get(IntervalCode::FifteenMin), get(IntervalCode::FiveMin), mode, htf_bias, now_ms),
        htf_bias,
    );
    let mut scalp_1h = normalize(
        evaluate_scalp_1h(get(IntervalCode::OneHour), get(IntervalCode::FifteenMin), get(IntervalCode::FiveMin), get(IntervalCode::FourHour), htf_bias, now_ms),
        htf_bias,
    );
    let mut micro_scalp = normalize(
        evaluate_micro_scalp(get(IntervalCode::OneHour), get(IntervalCode::FifteenMin), get(IntervalCode::FiveMin), htf_bias, now_ms),
        htf_bias,
    );
    let trend_rider = normalize(evaluate_trend_rider_strategy(timeframes, mode, htf_bias, now_ms), htf_bias);

    let mut override_used = false;
    let mut override_notes = Vec::new();

    let ltf_aligns_with_bias = |tf: Option<&crate::domain::signal::TimeframeAnalysis>, dir: BiasDirection| {
        tf.map(|a| match dir {
            BiasDirection::Long => a.indicators.analysis.trend != Trend::Downtrend,
            BiasDirection::Short => a.indicators.analysis.trend != Trend::Uptrend,
            BiasDirection::Neutral => false,
        })
        .unwrap_or(false)
    };

    let force_eligible = mode == Mode::Aggressive
        && trend4h == Trend::Flat
        && htf_bias.confidence >= 70
        && htf_bias.direction != BiasDirection::Neutral
        && ltf_aligns_with_bias(get(IntervalCode::OneHour), htf_bias.direction)
        && ltf_aligns_with_bias(get(IntervalCode::FifteenMin), htf_bias.direction);

    if force_eligible {
        let already_valid = FORCE_PRIORITY.iter().find(|s| match s {
            SelectedStrategy::Trend4h => trend_4h.valid,
            SelectedStrategy::Scalp1h => scalp_1h.valid,
            SelectedStrategy::MicroScalp => micro_scalp.valid,
            _ => false,
        });

        match already_valid {
            Some(strategy) => {
                override_used = true;
                override_notes.push(format!("{} already valid under AGGRESSIVE HTF override", strategy.human_name()));
            }
            None => {
                override_used = true;
                override_notes.push("Forced TREND_4H via AGGRESSIVE HTF override".to_string());
                trend_4h = normalize(force_trend_4h(get(IntervalCode::FourHour), htf_bias, now_ms), htf_bias);
            }
        }
    }

    let strategies = StrategySignals { swing, trend_4h, scalp_1h, micro_scalp, trend_rider };

    let priority: &[SelectedStrategy] = match mode {
        Mode::Safe => &SAFE_PRIORITY,
        Mode::Aggressive => &AGGRESSIVE_PRIORITY,
    };

    let best_signal = priority
        .iter()
        .find(|s| strategies.get(**s).is_some_and(|sig| sig.valid))
        .copied()
        .or_else(|| {
            strategies
                .iter()
                .filter(|(_, sig)| sig.valid)
                .max_by_key(|(_, sig)| sig.confidence)
                .map(|(s, _)| s)
        });

    AggregateResult { strategies, best_signal, override_used, override_notes }
}

/// Builds a TREND_4H-shaped signal directly from HTF bias direction when the
/// evaluator's own AGGRESSIVE-FLAT path still failed a secondary gate.
/// Entry geometry matches the standard evaluator exactly.
fn force_trend_4h(tf4h: Option<&crate::domain::signal::TimeframeAnalysis>, htf_bias: HtfBias, now_ms: i64) -> Signal {
    let Some(tf4h) = tf4h else {
        return no_trade(
            SelectedStrategy::Trend4h,
            vec![SelectedStrategy::Trend4h],
            vec!["4H data unavailable for override".to_string()],
            "4H data unavailable for override",
            htf_bias,
            now_ms,
        );
    };
    let direction = match htf_bias.direction {
        BiasDirection::Long => Direction::Long,
        BiasDirection::Short => Direction::Short,
        BiasDirection::Neutral => Direction::NoTrade,
    };
    if direction == Direction::NoTrade {
        return no_trade(
            SelectedStrategy::Trend4h,
            vec![SelectedStrategy::Trend4h],
            vec!["HTF bias neutral".to_string()],
            "HTF bias neutral",
            htf_bias,
            now_ms,
        );
    }

    let ema21_4h = tf4h.indicators.ema.ema21.unwrap_or(tf4h.indicators.price.current);
    let zone: EntryZone = if direction == Direction::Long {
        entry_zone(ema21_4h * 0.996, ema21_4h * 1.002)
    } else {
        entry_zone(ema21_4h * 0.998, ema21_4h * 1.004)
    };
    let entry_mid = (zone.min + zone.max) / 2.0;
    let stop = if direction == Direction::Long {
        if tf4h.structure.swing_low > 0.0 { tf4h.structure.swing_low * 0.997 } else { entry_mid * 0.97 }
    } else if tf4h.structure.swing_high > 0.0 {
        tf4h.structure.swing_high * 1.003
    } else {
        entry_mid * 1.03
    };
    let risk = (entry_mid - stop).abs();
    let sign = if direction == Direction::Long { 1.0 } else { -1.0 };
    let targets = vec![entry_mid + sign * risk, entry_mid + sign * risk * 2.0];

    Signal {
        valid: true,
        direction,
        setup_type: crate::domain::signal::SetupType::FourHour,
        selected_strategy: SelectedStrategy::Trend4h,
        strategies_checked: vec![SelectedStrategy::Trend4h],
        confidence: htf_bias.confidence.min(85),
        entry_zone: Some(zone),
        stop_loss: Some(stop),
        invalidation_level: Some(stop),
        risk_reward: risk_reward_for(&targets, entry_mid, stop),
        targets,
        reason_summary: "AGGRESSIVE override: HTF bias confirms 4H direction while 4H trend is FLAT".to_string(),
        confluence: crate::domain::signal::Confluence::default(),
        conditions_required: Vec::new(),
        htf_bias,
        timestamp: now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::BiasSource;

    #[test]
    fn safe_4h_flat_gives_all_no_trade() {
        let timeframes = TimeframeMap::default();
        let htf_bias = HtfBias::default();
        let result = evaluate_all_strategies(&timeframes, Mode::Safe, htf_bias, 0);
        assert!(result.strategies.iter().all(|(_, s)| !s.valid));
        assert!(result.best_signal.is_none());
    }

    #[test]
    fn aggressive_force_eligibility_requires_high_confidence_bias() {
        let timeframes = TimeframeMap::default();
        let htf_bias = HtfBias { direction: BiasDirection::Long, confidence: 80, source: BiasSource::OneHour };
        let result = evaluate_all_strategies(&timeframes, Mode::Aggressive, htf_bias, 0);
        // No 4h/1h/15m data at all means ltf_aligns_with_bias is false, so no forcing happens.
        assert!(!result.override_used);
    }
}
