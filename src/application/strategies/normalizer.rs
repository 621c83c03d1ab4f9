use crate::domain::signal::{BiasDirection, Confluence, Direction, HtfBias, RiskReward, Signal};

/// Canonical shape enforcement applied to every emitted signal, valid or
/// not. Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(mut signal: Signal, htf_bias: HtfBias) -> Signal {
    signal.confidence = signal.confidence.min(100);

    if !signal.valid {
        signal.direction = Direction::NoTrade;
        signal.confidence = 0;
        signal.entry_zone = None;
        signal.stop_loss = None;
        signal.invalidation_level = None;
        signal.targets.clear();
        signal.risk_reward = RiskReward::none();
        if signal.conditions_required.is_empty() {
            signal.conditions_required = vec!["No qualifying setup".to_string()];
        }
    } else {
        signal.targets.truncate(3);
        signal.conditions_required.clear();
    }

    signal.confluence = Confluence {
        htf_confirmation: htf_confirmation(&signal, htf_bias),
        ..signal.confluence
    };
    signal.htf_bias = htf_bias;

    signal
}

fn htf_confirmation(signal: &Signal, htf_bias: HtfBias) -> bool {
    match signal.direction {
        Direction::Long => htf_bias.direction == BiasDirection::Long,
        Direction::Short => htf_bias.direction == BiasDirection::Short,
        Direction::NoTrade => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::strategies::common::no_trade;
    use crate::domain::signal::SelectedStrategy;

    #[test]
    fn idempotent_on_invalid_signal() {
        let bias = HtfBias::default();
        let signal = no_trade(SelectedStrategy::Swing, vec![], vec!["x".into()], "r", bias, 0);
        let once = normalize(signal.clone(), bias);
        let twice = normalize(once.clone(), bias);
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_signal_has_null_price_fields() {
        let bias = HtfBias::default();
        let signal = no_trade(SelectedStrategy::Swing, vec![], vec![], "r", bias, 0);
        let normalized = normalize(signal, bias);
        assert!(normalized.entry_zone.is_none());
        assert!(normalized.stop_loss.is_none());
        assert_eq!(normalized.confidence, 0);
        assert!(!normalized.conditions_required.is_empty());
    }
}
