use crate::domain::chart_features::{CurrentStructure, DivergenceType, LiquidityZoneType, StructureDirection};
use crate::domain::indicators::PullbackState;
use crate::domain::signal::{
    BiasDirection, Confluence, Direction, EntryZone, HtfBias, Mode, SelectedStrategy, SetupType, Signal, TimeframeAnalysis,
    VolatilityState,
};

use super::common::{clamp_confidence, entry_zone, no_trade, risk_reward_for};

const TREND_RIDER_ATR_MULT: f64 = 2.0;
const OTHER_ATR_MULT: f64 = 1.5;

struct Score {
    long: f64,
    short: f64,
}

/// Confluence-scoring evaluator spanning 4h and 1h structure. Weights are
/// fixed constants rather than configuration: htf alignment ±20, 4h
/// structure ±10, 1h structure ±7, 4h pullback +8, 1h pullback +5,
/// liquidity zones up to 15, FVGs ±10, divergences ±10 (regular > hidden),
/// volatility −8..+5, volume-profile position +7/−3.
pub fn evaluate_trend_rider(
    tf4h: Option<&TimeframeAnalysis>,
    tf1h: Option<&TimeframeAnalysis>,
    mode: Mode,
    htf_bias: HtfBias,
    now_ms: i64,
) -> Signal {
    let checked = vec![SelectedStrategy::TrendRider];

    let (Some(tf4h), Some(tf1h)) = (tf4h, tf1h) else {
        return no_trade(
            SelectedStrategy::TrendRider,
            checked,
            vec!["4H and 1H candle data are required".to_string()],
            "Insufficient data for confluence scoring",
            htf_bias,
            now_ms,
        );
    };

    let score = compute_score(tf4h, tf1h, htf_bias);
    let (direction, raw_score) = if score.long >= score.short {
        (Direction::Long, score.long)
    } else {
        (Direction::Short, score.short)
    };
    let final_score = raw_score.clamp(0.0, 100.0);

    let atr_pct = tf4h.volatility.atr_pct_of_price;
    let htf_aligned = match direction {
        Direction::Long => htf_bias.direction == BiasDirection::Long,
        Direction::Short => htf_bias.direction == BiasDirection::Short,
        Direction::NoTrade => false,
    };

    let passes = match mode {
        Mode::Safe => final_score >= 70.0 && htf_aligned && atr_pct <= 3.0,
        Mode::Aggressive => final_score >= 50.0 && atr_pct <= 5.0,
    };

    if !passes {
        return no_trade(
            SelectedStrategy::TrendRider,
            checked,
            vec!["Confluence score/volatility/HTF-alignment thresholds not met".to_string()],
            "Confluence score below mode threshold",
            htf_bias,
            now_ms,
        );
    }

    let strong4h = tf4h.indicators.trend_strength.map(|t| t.strong).unwrap_or(false);
    let strong1h = tf1h.indicators.trend_strength.map(|t| t.strong).unwrap_or(false);

    let (setup_type, atr_mult, selected_strategy) = if strong4h && strong1h && final_score >= 75.0 {
        (SetupType::Auto, TREND_RIDER_ATR_MULT, SelectedStrategy::TrendRider)
    } else if tf4h.indicators.analysis.trend != crate::domain::indicators::Trend::Flat && final_score >= 65.0 {
        (SetupType::FourHour, OTHER_ATR_MULT, SelectedStrategy::Trend4h)
    } else if tf1h.indicators.analysis.trend != crate::domain::indicators::Trend::Flat {
        (SetupType::Scalp, OTHER_ATR_MULT, SelectedStrategy::Scalp1h)
    } else {
        (SetupType::Swing, OTHER_ATR_MULT, SelectedStrategy::Swing)
    };

    let price = tf4h.indicators.price.current;
    let atr = tf4h.volatility.atr;
    let sign = if direction == Direction::Long { 1.0 } else { -1.0 };
    let stop = price - sign * atr * atr_mult;
    let risk = (price - stop).abs();

    let zone: EntryZone = entry_zone(price * 0.999, price * 1.001);

    let liquidity_target = nearest_liquidity_target(tf4h, direction, price);
    let mut targets = vec![price + sign * risk * 1.0, price + sign * risk * 2.0];
    targets.push(liquidity_target.unwrap_or(price + sign * risk * 3.0));

    let confidence = clamp_confidence(final_score);

    Signal {
        valid: true,
        direction,
        setup_type,
        selected_strategy,
        strategies_checked: checked,
        confidence,
        entry_zone: Some(zone),
        stop_loss: Some(stop),
        invalidation_level: Some(stop),
        risk_reward: risk_reward_for(&targets, price, stop),
        targets,
        reason_summary: format!(
            "Confluence score {:.0} favors {}",
            final_score,
            if direction == Direction::Long { "long" } else { "short" }
        ),
        confluence: Confluence::default(),
        conditions_required: Vec::new(),
        htf_bias,
        timestamp: now_ms,
    }
}

fn compute_score(tf4h: &TimeframeAnalysis, tf1h: &TimeframeAnalysis, htf_bias: HtfBias) -> Score {
    let mut long = 0.0_f64;
    let mut short = 0.0_f64;

    let htf_contribution = htf_bias.confidence as f64 / 100.0 * 20.0;
    match htf_bias.direction {
        BiasDirection::Long => long += htf_contribution,
        BiasDirection::Short => short += htf_contribution,
        BiasDirection::Neutral => {}
    }

    match tf4h.market_structure.current_structure {
        Some(CurrentStructure::Uptrend) => long += 10.0,
        Some(CurrentStructure::Downtrend) => short += 10.0,
        _ => {}
    }
    match tf1h.market_structure.current_structure {
        Some(CurrentStructure::Uptrend) => long += 7.0,
        Some(CurrentStructure::Downtrend) => short += 7.0,
        _ => {}
    }

    let constructive_pullback = |p: PullbackState| matches!(p, PullbackState::EntryZone | PullbackState::Retracing);
    if constructive_pullback(tf4h.indicators.analysis.pullback_state) {
        match tf4h.indicators.analysis.trend {
            crate::domain::indicators::Trend::Uptrend => long += 8.0,
            crate::domain::indicators::Trend::Downtrend => short += 8.0,
            _ => {}
        }
    }
    if constructive_pullback(tf1h.indicators.analysis.pullback_state) {
        match tf1h.indicators.analysis.trend {
            crate::domain::indicators::Trend::Uptrend => long += 5.0,
            crate::domain::indicators::Trend::Downtrend => short += 5.0,
            _ => {}
        }
    }

    let liquidity_score: f64 = tf4h
        .liquidity_zones
        .iter()
        .map(|z| match z.r#type {
            LiquidityZoneType::EqualLows => 5.0,
            LiquidityZoneType::EqualHighs => 5.0,
        })
        .sum();
    for z in &tf4h.liquidity_zones {
        match z.r#type {
            LiquidityZoneType::EqualLows => long += (liquidity_score.min(15.0)) / tf4h.liquidity_zones.len().max(1) as f64,
            LiquidityZoneType::EqualHighs => short += (liquidity_score.min(15.0)) / tf4h.liquidity_zones.len().max(1) as f64,
        }
    }

    for gap in &tf4h.fair_value_gaps {
        if gap.filled {
            continue;
        }
        match gap.direction {
            StructureDirection::Bullish => long += 5.0,
            StructureDirection::Bearish => short += 5.0,
        }
    }
    long = long.min(100.0);
    short = short.min(100.0);

    for div in &tf4h.divergences {
        let weight = match div.r#type {
            DivergenceType::Regular => 10.0,
            DivergenceType::Hidden => 5.0,
        };
        match div.side {
            StructureDirection::Bullish => long += weight,
            StructureDirection::Bearish => short += weight,
        }
    }

    let volatility_adjustment = match tf4h.volatility.state {
        VolatilityState::Low => 2.0,
        VolatilityState::Normal => 5.0,
        VolatilityState::High => -4.0,
        VolatilityState::Extreme => -8.0,
    };
    if long >= short {
        long += volatility_adjustment;
    } else {
        short += volatility_adjustment;
    }

    let price = tf4h.indicators.price.current;
    if let (Some(vah), Some(val)) = (tf4h.volume_profile.value_area_high, tf4h.volume_profile.value_area_low) {
        if price > vah {
            long += 7.0;
        } else if price < val {
            short += 7.0;
        } else if long >= short {
            long -= 3.0;
        } else {
            short -= 3.0;
        }
    }

    Score { long: long.max(0.0), short: short.max(0.0) }
}

fn nearest_liquidity_target(tf: &TimeframeAnalysis, direction: Direction, price: f64) -> Option<f64> {
    let wanted = match direction {
        Direction::Long => LiquidityZoneType::EqualHighs,
        Direction::Short => LiquidityZoneType::EqualLows,
        Direction::NoTrade => return None,
    };
    tf.liquidity_zones
        .iter()
        .filter(|z| z.r#type == wanted)
        .map(|z| z.price)
        .min_by(|a, b| (a - price).abs().partial_cmp(&(b - price).abs()).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_is_no_trade() {
        let signal = evaluate_trend_rider(None, None, Mode::Safe, HtfBias::default(), 0);
        assert!(!signal.valid);
    }
}
