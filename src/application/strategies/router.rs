use crate::domain::market::IntervalCode;
use crate::domain::signal::{HtfBias, Mode, SelectedStrategy, SetupType, Signal, TimeframeMap};

use super::micro_scalp::evaluate_micro_scalp;
use super::scalp_1h::evaluate_scalp_1h;
use super::swing::evaluate_swing;
use super::trend_4h::evaluate_trend_4h;
use super::trend_rider::evaluate_trend_rider;

/// Dispatches a single-strategy evaluation. `SetupType::Auto` cascades
/// SWING → TREND_4H → SCALP_1H, falling through to NO_TRADE (AGGRESSIVE
/// forcing is handled separately by the aggregator, not this router).
pub fn evaluate_strategy(timeframes: &TimeframeMap, setup_type: SetupType, mode: Mode, htf_bias: HtfBias, now_ms: i64) -> Signal {
    let get = |i: IntervalCode| timeframes.get(i);

    match setup_type {
        SetupType::Swing => evaluate_swing(get(IntervalCode::ThreeDay), get(IntervalCode::OneDay), get(IntervalCode::FourHour), htf_bias, now_ms),
        SetupType::FourHour => evaluate_trend_4h(
            get(IntervalCode::FourHour),
            get(IntervalCode::OneHour),
            get(IntervalCode::FifteenMin),
            get(IntervalCode::FiveMin),
            mode,
            htf_bias,
            now_ms,
        ),
        SetupType::Scalp => evaluate_scalp_1h(
            get(IntervalCode::OneHour),
            get(IntervalCode::FifteenMin),
            get(IntervalCode::FiveMin),
            get(IntervalCode::FourHour),
            htf_bias,
            now_ms,
        ),
        SetupType::MicroScalp => evaluate_micro_scalp(get(IntervalCode::OneHour), get(IntervalCode::FifteenMin), get(IntervalCode::FiveMin), htf_bias, now_ms),
        SetupType::Auto => {
            let cascade = [
                evaluate_swing(get(IntervalCode::ThreeDay), get(IntervalCode::OneDay), get(IntervalCode::FourHour), htf_bias, now_ms),
                evaluate_trend_4h(
                    get(IntervalCode::FourHour),
                    get(IntervalCode::OneHour),
                    get(IntervalCode::FifteenMin),
                    get(IntervalCode::FiveMin),
                    mode,
                    htf_bias,
                    now_ms,
                ),
                evaluate_scalp_1h(
                    get(IntervalCode::OneHour),
                    get(IntervalCode::FifteenMin),
                    get(IntervalCode::FiveMin),
                    get(IntervalCode::FourHour),
                    htf_bias,
                    now_ms,
                ),
            ];
            cascade
                .into_iter()
                .find(|s| s.valid)
                .unwrap_or_else(|| super::common::no_trade(
                    SelectedStrategy::NoTrade,
                    vec![SelectedStrategy::Swing, SelectedStrategy::Trend4h, SelectedStrategy::Scalp1h],
                    vec!["No auto-cascade strategy produced a valid setup".to_string()],
                    "Auto cascade exhausted",
                    htf_bias,
                    now_ms,
                ))
        }
    }
}

/// Also exposed for the aggregator, which needs TREND_RIDER alongside the
/// four router-reachable strategies.
pub fn evaluate_trend_rider_strategy(timeframes: &TimeframeMap, mode: Mode, htf_bias: HtfBias, now_ms: i64) -> Signal {
    evaluate_trend_rider(timeframes.get(IntervalCode::FourHour), timeframes.get(IntervalCode::OneHour), mode, htf_bias, now_ms)
}
