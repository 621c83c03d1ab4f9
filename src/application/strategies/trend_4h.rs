use crate::domain::indicators::{PullbackState, StochCondition, Trend};
use crate::domain::signal::{
    BiasDirection, Confluence, Direction, EntryZone, HtfBias, Mode, SelectedStrategy, SetupType, Signal, TimeframeAnalysis,
};

use super::common::{clamp_confidence, entry_zone, no_trade, risk_reward_for};

const R_MULTIPLES: [f64; 2] = [1.0, 2.0];

pub fn evaluate_trend_4h(
    tf4h: Option<&TimeframeAnalysis>,
    tf1h: Option<&TimeframeAnalysis>,
    tf15m: Option<&TimeframeAnalysis>,
    tf5m: Option<&TimeframeAnalysis>,
    mode: Mode,
    htf_bias: HtfBias,
    now_ms: i64,
) -> Signal {
    let checked = vec![SelectedStrategy::Trend4h];

    let Some(tf4h) = tf4h else {
        return no_trade(
            SelectedStrategy::Trend4h,
            checked,
            vec!["4H candle data is required".to_string()],
            "Insufficient 4H data",
            htf_bias,
            now_ms,
        );
    };

    let trend4h = tf4h.indicators.analysis.trend;
    let effective_trend4h = if trend4h != Trend::Flat {
        Some(trend4h)
    } else if mode == Mode::Aggressive && htf_bias.confidence >= 70 {
        let ltf_aligns = |tf: Option<&TimeframeAnalysis>, dir: BiasDirection| {
            tf.map(|a| match dir {
                BiasDirection::Long => a.indicators.analysis.trend != Trend::Downtrend,
                BiasDirection::Short => a.indicators.analysis.trend != Trend::Uptrend,
                BiasDirection::Neutral => false,
            })
            .unwrap_or(false)
        };
        if ltf_aligns(tf1h, htf_bias.direction) && ltf_aligns(tf15m, htf_bias.direction) {
            match htf_bias.direction {
                BiasDirection::Long => Some(Trend::Uptrend),
                BiasDirection::Short => Some(Trend::Downtrend),
                BiasDirection::Neutral => None,
            }
        } else {
            None
        }
    } else {
        None
    };

    let Some(effective_trend4h) = effective_trend4h else {
        return no_trade(
            SelectedStrategy::Trend4h,
            checked,
            vec!["4H trend must be directional, or HTF bias must confirm with LTF alignment in AGGRESSIVE mode".to_string()],
            "4H trend is FLAT",
            htf_bias,
            now_ms,
        );
    };

    let direction = if effective_trend4h == Trend::Uptrend { Direction::Long } else { Direction::Short };

    let pullback4h = tf4h.indicators.analysis.pullback_state;
    if pullback4h == PullbackState::Overextended {
        return no_trade(
            SelectedStrategy::Trend4h,
            checked,
            vec!["Price must not be overextended from 4H EMA21".to_string()],
            "4H price overextended from EMA21",
            htf_bias,
            now_ms,
        );
    }

    let trend1h_blocks = match direction {
        Direction::Long => tf1h.map(|a| a.indicators.analysis.trend == Trend::Downtrend).unwrap_or(false),
        Direction::Short => tf1h.map(|a| a.indicators.analysis.trend == Trend::Uptrend).unwrap_or(false),
        Direction::NoTrade => false,
    };
    if trend1h_blocks {
        return no_trade(
            SelectedStrategy::Trend4h,
            checked,
            vec!["1H trend must not oppose 4H direction".to_string()],
            "1H trend opposes 4H",
            htf_bias,
            now_ms,
        );
    }

    let curl_15m = stoch_curls(tf15m, direction);
    let curl_5m = stoch_curls(tf5m, direction);
    if !curl_15m && !curl_5m {
        return no_trade(
            SelectedStrategy::Trend4h,
            checked,
            vec!["15m/5m stochastics must not both curl against direction".to_string()],
            "LTF momentum opposes direction",
            htf_bias,
            now_ms,
        );
    }

    let Some(ema21_4h) = tf4h.indicators.ema.ema21 else {
        return no_trade(
            SelectedStrategy::Trend4h,
            checked,
            vec!["4H EMA21 unavailable".to_string()],
            "Insufficient 4H EMA history",
            htf_bias,
            now_ms,
        );
    };

    let zone: EntryZone = if direction == Direction::Long {
        entry_zone(ema21_4h * 0.996, ema21_4h * 1.002)
    } else {
        entry_zone(ema21_4h * 0.998, ema21_4h * 1.004)
    };
    let entry_mid = (zone.min + zone.max) / 2.0;

    let stop = if direction == Direction::Long {
        if tf4h.structure.swing_low > 0.0 {
            tf4h.structure.swing_low * 0.997
        } else {
            entry_mid * 0.97
        }
    } else if tf4h.structure.swing_high > 0.0 {
        tf4h.structure.swing_high * 1.003
    } else {
        entry_mid * 1.03
    };

    let risk = (entry_mid - stop).abs();
    let sign = if direction == Direction::Long { 1.0 } else { -1.0 };
    let targets: Vec<f64> = R_MULTIPLES.iter().map(|r| entry_mid + sign * risk * r).collect();

    let mut score = 0.0_f64;
    score += if trend4h == effective_trend4h { 0.4 } else { 0.1 };
    match tf1h.map(|a| a.indicators.analysis.trend) {
        Some(t) if t == effective_trend4h => score += 0.2,
        Some(Trend::Flat) => score += 0.1,
        _ => {}
    }
    match (curl_15m, curl_5m) {
        (true, true) => score += 0.2,
        (true, false) | (false, true) => score += 0.1,
        _ => {}
    }
    let price_favorable = tf4h.indicators.price.current >= zone.min && tf4h.indicators.price.current <= zone.max
        || pullback4h == PullbackState::Retracing;
    if price_favorable {
        score += 0.1;
    }
    match pullback4h {
        PullbackState::EntryZone => score += 0.1,
        PullbackState::Retracing => score += 0.05,
        _ => {}
    }
    let confidence = clamp_confidence(score.clamp(0.0, 1.0) * 100.0);

    Signal {
        valid: true,
        direction,
        setup_type: SetupType::FourHour,
        selected_strategy: SelectedStrategy::Trend4h,
        strategies_checked: checked,
        confidence,
        entry_zone: Some(zone),
        stop_loss: Some(stop),
        invalidation_level: Some(stop),
        risk_reward: risk_reward_for(&targets, entry_mid, stop),
        targets,
        reason_summary: format!("4H trend {} confirmed by multi-timeframe momentum", if direction == Direction::Long { "up" } else { "down" }),
        confluence: Confluence::default(),
        conditions_required: Vec::new(),
        htf_bias,
        timestamp: now_ms,
    }
}

fn stoch_curls(tf: Option<&TimeframeAnalysis>, direction: Direction) -> bool {
    tf.map(|a| match direction {
        Direction::Long => matches!(a.indicators.stoch_rsi.condition, StochCondition::Bullish | StochCondition::Oversold),
        Direction::Short => matches!(a.indicators.stoch_rsi.condition, StochCondition::Bearish | StochCondition::Overbought),
        Direction::NoTrade => false,
    })
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_4h_data_is_no_trade() {
        let signal = evaluate_trend_4h(None, None, None, None, Mode::Safe, HtfBias::default(), 0);
        assert!(!signal.valid);
    }
}
