use crate::domain::indicators::{PullbackState, Trend};
use crate::domain::signal::{Confluence, Direction, EntryZone, HtfBias, SelectedStrategy, SetupType, Signal, TimeframeAnalysis};

use super::common::{clamp_confidence, entry_zone, no_trade, risk_reward_for, stoch_favors_long, stoch_favors_short};

const R_MULTIPLES: [f64; 3] = [3.0, 4.0, 5.0];

/// 3D / 1D / 4H swing setup. Requires all three timeframes; each evaluator
/// reads only the analyses it needs.
pub fn evaluate_swing(
    tf3d: Option<&TimeframeAnalysis>,
    tf1d: Option<&TimeframeAnalysis>,
    tf4h: Option<&TimeframeAnalysis>,
    htf_bias: HtfBias,
    now_ms: i64,
) -> Signal {
    let checked = vec![SelectedStrategy::Swing];

    let (Some(tf3d), Some(tf1d), Some(tf4h)) = (tf3d, tf1d, tf4h) else {
        return no_trade(
            SelectedStrategy::Swing,
            checked,
            vec!["3D, 1D and 4H candle data are all required".to_string()],
            "Insufficient multi-timeframe data for Swing evaluation",
            htf_bias,
            now_ms,
        );
    };

    let pullback3d = tf3d.indicators.analysis.pullback_state;
    let pullback1d = tf1d.indicators.analysis.pullback_state;
    let pullback4h = tf4h.indicators.analysis.pullback_state;

    if !matches!(pullback3d, PullbackState::Overextended | PullbackState::Retracing)
        || !matches!(pullback1d, PullbackState::Retracing | PullbackState::EntryZone)
    {
        return no_trade(
            SelectedStrategy::Swing,
            checked,
            vec!["3D must be overextended/retracing and 1D retracing/entry-zone".to_string()],
            "3D/1D pullback gate not met",
            htf_bias,
            now_ms,
        );
    }

    let (Some(ema21_3d), Some(ema21_1d)) = (tf3d.indicators.ema.ema21, tf1d.indicators.ema.ema21) else {
        return no_trade(
            SelectedStrategy::Swing,
            checked,
            vec!["3D/1D EMA21 unavailable".to_string()],
            "Insufficient EMA history",
            htf_bias,
            now_ms,
        );
    };

    let price = tf1d.indicators.price.current;
    let overextension_pct = (ema21_3d - price) / ema21_3d * 100.0;
    let ratio_1d = if ema21_1d != 0.0 { price / ema21_1d * 100.0 } else { 0.0 };

    let trend3d_up = tf3d.indicators.analysis.trend == Trend::Uptrend
        || (tf3d.indicators.analysis.trend == Trend::Flat && stoch_favors_long(tf3d.indicators.stoch_rsi.condition));
    let trend3d_down = tf3d.indicators.analysis.trend == Trend::Downtrend
        || (tf3d.indicators.analysis.trend == Trend::Flat && stoch_favors_short(tf3d.indicators.stoch_rsi.condition));
    let trend4h_up = tf4h.indicators.analysis.trend == Trend::Uptrend
        || (tf4h.indicators.analysis.trend == Trend::Flat && stoch_favors_long(tf4h.indicators.stoch_rsi.condition));
    let trend4h_down = tf4h.indicators.analysis.trend == Trend::Downtrend
        || (tf4h.indicators.analysis.trend == Trend::Flat && stoch_favors_short(tf4h.indicators.stoch_rsi.condition));
    let pullback4h_ok = matches!(pullback4h, PullbackState::Retracing | PullbackState::EntryZone);

    let long_ok = trend3d_up
        && (8.0..=15.0).contains(&overextension_pct)
        && (90.0..=102.0).contains(&ratio_1d)
        && trend4h_up
        && pullback4h_ok;
    let short_ok = trend3d_down
        && (-15.0..=-8.0).contains(&overextension_pct)
        && (98.0..=110.0).contains(&ratio_1d)
        && trend4h_down
        && pullback4h_ok;

    if !long_ok && !short_ok {
        return no_trade(
            SelectedStrategy::Swing,
            checked,
            vec!["3D overextension, 1D positioning and 4H trend must all align".to_string()],
            "Swing confluence not met",
            htf_bias,
            now_ms,
        );
    }

    let direction = if long_ok { Direction::Long } else { Direction::Short };

    let swing_mid_1d = (tf1d.structure.swing_high + tf1d.structure.swing_low) / 2.0;
    let reclaim = (swing_mid_1d + ema21_1d) / 2.0;
    let zone: EntryZone = entry_zone(reclaim * 0.995, reclaim * 1.005);
    let entry_mid = (zone.min + zone.max) / 2.0;

    let stop = if direction == Direction::Long {
        tf3d.structure.swing_low.min(tf1d.structure.swing_low)
    } else {
        tf3d.structure.swing_high.max(tf1d.structure.swing_high)
    };
    let risk = (entry_mid - stop).abs();
    let sign = if direction == Direction::Long { 1.0 } else { -1.0 };
    let targets: Vec<f64> = R_MULTIPLES.iter().map(|r| entry_mid + sign * risk * r).collect();

    let mut confidence: f64 = 70.0;
    let strong_stoch = if direction == Direction::Long {
        stoch_favors_long(tf3d.indicators.stoch_rsi.condition) && stoch_favors_long(tf4h.indicators.stoch_rsi.condition)
    } else {
        stoch_favors_short(tf3d.indicators.stoch_rsi.condition) && stoch_favors_short(tf4h.indicators.stoch_rsi.condition)
    };
    if strong_stoch {
        confidence += 10.0;
    }
    if pullback4h == PullbackState::EntryZone {
        confidence += 5.0;
    }
    if overextension_pct.abs() >= 12.0 {
        confidence += 5.0;
    }
    let confidence = clamp_confidence(confidence.clamp(70.0, 90.0));

    Signal {
        valid: true,
        direction,
        setup_type: SetupType::Swing,
        selected_strategy: SelectedStrategy::Swing,
        strategies_checked: checked,
        confidence,
        entry_zone: Some(zone),
        stop_loss: Some(stop),
        invalidation_level: Some(stop),
        risk_reward: risk_reward_for(&targets, entry_mid, stop),
        targets,
        reason_summary: format!(
            "Swing {} setup: 3D/1D/4H aligned",
            if direction == Direction::Long { "long" } else { "short" }
        ),
        confluence: Confluence::default(),
        conditions_required: Vec::new(),
        htf_bias,
        timestamp: now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::timeframe_analysis::build_timeframe_analysis;
    use crate::domain::market::{Candle, IntervalCode};

    fn trending_candles(start: f64, step: f64, len: usize) -> Vec<Candle> {
        (0..len)
            .map(|i| {
                let base = start + step * i as f64;
                Candle::new(i as i64 * 60_000, base, base + 1.0, base - 1.0, base + 0.2, 10.0)
            })
            .collect()
    }

    #[test]
    fn missing_timeframes_is_no_trade() {
        let bias = HtfBias::default();
        let signal = evaluate_swing(None, None, None, bias, 0);
        assert!(!signal.valid);
        assert_eq!(signal.direction, Direction::NoTrade);
    }

    #[test]
    fn does_not_panic_on_flat_aligned_data() {
        let candles = trending_candles(100.0, 0.0, 250);
        let tf = build_timeframe_analysis(&candles, IntervalCode::FourHour);
        let bias = HtfBias::default();
        let signal = evaluate_swing(Some(&tf), Some(&tf), Some(&tf), bias, 0);
        assert_eq!(signal.htf_bias, bias);
    }
}
