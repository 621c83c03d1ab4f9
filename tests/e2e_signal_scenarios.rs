//! End-to-end scenario coverage for the strategy evaluators, built directly
//! from hand-specified `TimeframeAnalysis` records rather than raw candles —
//! the evaluators are pure functions of the analysis fields, so this pins
//! down exact gate/entry/target arithmetic without depending on how the
//! indicator pipeline happens to shape a given candle series.

use rustrade_signals::application::strategies::aggregator::evaluate_all_strategies;
use rustrade_signals::application::strategies::micro_scalp::evaluate_micro_scalp;
use rustrade_signals::application::strategies::swing::evaluate_swing;
use rustrade_signals::application::strategies::trend_4h::evaluate_trend_4h;
use rustrade_signals::domain::chart_features::{
    AdvancedIndicators, CandleAnatomy, CandleDirection, ChartFeatures, MarketStructure, PriceActionPatterns, RawOhlc, SupportResistance, VolumeProfile,
};
use rustrade_signals::domain::indicators::{
    AnalysisBlock, CandlestickPatterns, EmaBlock, Indicators, Metadata, PriceBlock, PullbackState, StochCondition, StochRsiWithHistory, Trend, WickAnalysis,
};
use rustrade_signals::domain::market::{Candle, SwingPoints};
use rustrade_signals::domain::signal::{
    BiasDirection, BiasSource, Direction, HtfBias, Mode, SelectedStrategy, SetupType, TimeframeAnalysis, TimeframeMap, Volatility, VolatilityState,
};
use rustrade_signals::domain::market::IntervalCode;

/// Builds a fully-populated `TimeframeAnalysis` from just the handful of
/// fields each scenario actually cares about; everything else gets a
/// structurally valid, inert default.
#[allow(clippy::too_many_arguments)]
fn analysis(trend: Trend, pullback: PullbackState, ema21: f64, price: f64, stoch_k: f64, stoch_condition: StochCondition, swing_low: f64, swing_high: f64) -> TimeframeAnalysis {
    let indicators = Indicators {
        price: PriceBlock { current: price, high: price, low: price },
        ema: EmaBlock { ema21: Some(ema21), ema200: Some(ema21), ema21_history: vec![ema21], ema200_history: vec![ema21] },
        stoch_rsi: StochRsiWithHistory { k: stoch_k, d: stoch_k, condition: stoch_condition, history: vec![stoch_k] },
        rsi: None,
        analysis: AnalysisBlock { trend, pullback_state: pullback, distance_from21_ema: (price - ema21) / ema21 * 100.0 },
        trend_strength: None,
        candlestick_patterns: CandlestickPatterns::default(),
        wick_analysis: WickAnalysis::default(),
        metadata: Metadata { candle_count: 250, last_update: 0 },
    };

    let chart_features = ChartFeatures {
        candle_anatomy: CandleAnatomy {
            direction: CandleDirection::Bull,
            body_pct: 0.0,
            upper_wick_pct: 0.0,
            lower_wick_pct: 0.0,
            close_relative_to_range: 50.0,
            close_above_ema21: price >= ema21,
            close_below_ema21: price < ema21,
            raw: RawOhlc { open: price, high: price, low: price, close: price },
        },
        price_action: PriceActionPatterns::default(),
        support_resistance: SupportResistance::default(),
        market_structure: MarketStructure::default(),
        liquidity_zones: Vec::new(),
        fair_value_gaps: Vec::new(),
        divergences: Vec::new(),
        volume_profile: VolumeProfile::default(),
        advanced: AdvancedIndicators::default(),
    };

    TimeframeAnalysis {
        indicators,
        structure: SwingPoints { swing_high, swing_low },
        candle_count: 250,
        last_candle: Candle::new(0, price, price, price, price, 10.0),
        market_structure: chart_features.market_structure,
        volatility: Volatility { atr: 1.0, atr_pct_of_price: 1.0, state: VolatilityState::Normal },
        volume: None,
        volume_profile: chart_features.volume_profile.clone(),
        liquidity_zones: chart_features.liquidity_zones.clone(),
        fair_value_gaps: chart_features.fair_value_gaps.clone(),
        divergences: chart_features.divergences.clone(),
        chart_features,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// Clean 4H uptrend entry at EMA21.
#[test]
fn clean_4h_uptrend_entry_emits_valid_long() {
    let tf4h = analysis(Trend::Uptrend, PullbackState::EntryZone, 100.0, 100.0, 50.0, StochCondition::Neutral, 95.0, 0.0);
    let tf1h = analysis(Trend::Uptrend, PullbackState::EntryZone, 100.0, 100.0, 50.0, StochCondition::Neutral, 95.0, 0.0);
    let tf15m = analysis(Trend::Uptrend, PullbackState::EntryZone, 100.0, 100.0, 30.0, StochCondition::Bullish, 95.0, 0.0);

    let signal = evaluate_trend_4h(Some(&tf4h), Some(&tf1h), Some(&tf15m), None, Mode::Safe, HtfBias::default(), 0);

    assert!(signal.valid);
    assert_eq!(signal.direction, Direction::Long);
    assert_eq!(signal.setup_type, SetupType::FourHour);
    assert_eq!(signal.selected_strategy, SelectedStrategy::Trend4h);
    assert!(signal.confidence >= 70);

    let zone = signal.entry_zone.expect("valid signal must carry an entry zone");
    assert!(close(zone.min, 99.6));
    assert!(close(zone.max, 100.2));
    assert!(close(signal.stop_loss.unwrap(), 95.0 * 0.997));
    assert_eq!(signal.targets.len(), 2);
    assert!(signal.risk_reward.tp1_rr > 0.0);
}

/// Swing long with 3D overextension, 1D retracing, 4H entry zone confluence.
#[test]
fn swing_long_ideal_confluence() {
    let tf3d = analysis(Trend::Uptrend, PullbackState::Overextended, 100.0, 100.0, 70.0, StochCondition::Bullish, 80.0, 0.0);
    let tf1d = analysis(Trend::Uptrend, PullbackState::Retracing, 95.0, 90.0, 20.0, StochCondition::Oversold, 90.0, 110.0);
    let tf4h = analysis(Trend::Uptrend, PullbackState::EntryZone, 100.0, 100.0, 70.0, StochCondition::Bullish, 0.0, 0.0);

    let signal = evaluate_swing(Some(&tf3d), Some(&tf1d), Some(&tf4h), HtfBias::default(), 0);

    assert!(signal.valid);
    assert_eq!(signal.direction, Direction::Long);
    assert_eq!(signal.selected_strategy, SelectedStrategy::Swing);
    assert!((70..=90).contains(&(signal.confidence as i32)));
    assert_eq!(signal.targets.len(), 3);
    assert!(close(signal.targets[0], 150.0));
    assert!(close(signal.targets[1], 167.5));
    assert!(close(signal.targets[2], 185.0));
    assert!(close(signal.stop_loss.unwrap(), 80.0));
}

/// Micro-scalp on tight 15m/5m confluence around EMA21, plus the aggregator
/// re-emitting the same setup under SAFE mode when 4h isn't FLAT.
#[test]
fn micro_scalp_tight_confluence_both_standalone_and_aggregated() {
    let tf1h = analysis(Trend::Uptrend, PullbackState::EntryZone, 100.0, 100.0, 50.0, StochCondition::Neutral, 95.0, 0.0);
    let tf15m = analysis(Trend::Uptrend, PullbackState::EntryZone, 100.0, 100.0, 20.0, StochCondition::Oversold, 98.0, 0.0);
    let tf5m = analysis(Trend::Uptrend, PullbackState::Retracing, 100.0, 100.2, 30.0, StochCondition::Oversold, 97.0, 0.0);

    let standalone = evaluate_micro_scalp(Some(&tf1h), Some(&tf15m), Some(&tf5m), HtfBias::default(), 0);
    assert!(standalone.valid);
    assert_eq!(standalone.direction, Direction::Long);
    assert_eq!(standalone.selected_strategy, SelectedStrategy::MicroScalp);
    assert_eq!(standalone.confidence, 70);
    assert!(close(standalone.stop_loss.unwrap(), 97.0));
    assert_eq!(standalone.targets.len(), 2);
    assert!(close(standalone.targets[0], 103.0));
    assert!(close(standalone.targets[1], 104.5));

    let tf4h = analysis(Trend::Uptrend, PullbackState::EntryZone, 100.0, 100.0, 50.0, StochCondition::Neutral, 95.0, 0.0);
    let mut timeframes = TimeframeMap::default();
    timeframes.push(IntervalCode::FourHour, tf4h);
    timeframes.push(IntervalCode::OneHour, tf1h);
    timeframes.push(IntervalCode::FifteenMin, tf15m);
    timeframes.push(IntervalCode::FiveMin, tf5m);

    let htf_bias = HtfBias { direction: BiasDirection::Long, confidence: 60, source: BiasSource::OneHour };
    let aggregate = evaluate_all_strategies(&timeframes, Mode::Safe, htf_bias, 0);

    let micro_scalp = aggregate.strategies.get(SelectedStrategy::MicroScalp).expect("micro scalp slot always present");
    assert!(micro_scalp.valid, "4H is UPTREND, not FLAT, so SAFE mode must not blanket-suppress the setup");
}

/// SAFE + 4H FLAT suppresses every strategy.
#[test]
fn safe_mode_with_flat_4h_suppresses_everything() {
    let tf4h = analysis(Trend::Flat, PullbackState::EntryZone, 100.0, 100.0, 50.0, StochCondition::Neutral, 95.0, 105.0);
    let tf1h = analysis(Trend::Uptrend, PullbackState::EntryZone, 100.0, 100.0, 30.0, StochCondition::Bullish, 95.0, 0.0);

    let mut timeframes = TimeframeMap::default();
    timeframes.push(IntervalCode::FourHour, tf4h);
    timeframes.push(IntervalCode::OneHour, tf1h);

    let htf_bias = HtfBias { direction: BiasDirection::Long, confidence: 55, source: BiasSource::OneHour };
    let aggregate = evaluate_all_strategies(&timeframes, Mode::Safe, htf_bias, 0);

    assert!(aggregate.strategies.iter().all(|(_, s)| !s.valid));
    assert!(aggregate.best_signal.is_none());
    assert!(!aggregate.override_used);
}
