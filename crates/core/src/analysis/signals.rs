use crate::domain::indicator::{IndicatorKey, SnapshotSet, Trend};
use crate::domain::report::{AssetClass, Signal, SignalAction};
use std::collections::BTreeMap;

pub type Signals = BTreeMap<AssetClass, Signal>;

/// Coarse advisory calls. An asset class is omitted when any indicator its rule
/// reads is missing from the set.
pub fn compute_signals(set: &SnapshotSet) -> Signals {
    let mut out = Signals::new();
    let fed_funds = set.get(IndicatorKey::FedFunds);
    let gdp = set.get(IndicatorKey::Gdp);
    let unemployment = set.get(IndicatorKey::Unemployment);

    if let Some(fed_funds) = fed_funds {
        let signal = match fed_funds.trend {
            Trend::Up => Signal::new(SignalAction::Sell, "Rising rates hurt bond prices"),
            Trend::Down => Signal::new(SignalAction::Buy, "Falling rates support bond prices"),
            Trend::Stable => Signal::new(SignalAction::Hold, "Stable rates"),
        };
        out.insert(AssetClass::Bonds, signal);
    }

    if let (Some(gdp), Some(unemployment)) = (gdp, unemployment) {
        let signal = if gdp.change_percent > 2.0 && unemployment.latest_value < 5.0 {
            Signal::new(SignalAction::Buy, "Strong growth and employment")
        } else if gdp.change_percent < 0.0 || unemployment.latest_value > 7.0 {
            Signal::new(SignalAction::Sell, "Weak economic conditions")
        } else {
            Signal::new(SignalAction::Hold, "Mixed signals")
        };
        out.insert(AssetClass::Equities, signal);
    }

    if let (Some(fed_funds), Some(gdp)) = (fed_funds, gdp) {
        let signal = match fed_funds.trend {
            Trend::Up if gdp.change_percent > 1.5 => {
                Signal::new(SignalAction::Buy, "Rising rates and growth support USD")
            }
            Trend::Down if gdp.change_percent < 1.0 => {
                Signal::new(SignalAction::Sell, "Falling rates and weak growth")
            }
            _ => Signal::new(SignalAction::Hold, "Neutral conditions"),
        };
        out.insert(AssetClass::Dollar, signal);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::fixtures::{set, with_change};

    fn rendered(signals: &Signals) -> Vec<(AssetClass, String)> {
        signals.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn empty_set_has_no_signals() {
        assert!(compute_signals(&SnapshotSet::empty()).is_empty());
    }

    #[test]
    fn bonds_follow_fed_funds_trend_alone() {
        let s = set([with_change(IndicatorKey::FedFunds, 5.33, -0.5)]);
        assert_eq!(
            rendered(&compute_signals(&s)),
            vec![(AssetClass::Bonds, "BUY - Falling rates support bond prices".to_string())]
        );
    }

    #[test]
    fn equities_omitted_without_unemployment() {
        let s = set([
            with_change(IndicatorKey::Gdp, 29_000.0, 3.0),
            with_change(IndicatorKey::FedFunds, 4.0, 2.0),
        ]);
        let signals = compute_signals(&s);
        assert!(!signals.contains_key(&AssetClass::Equities));
        assert_eq!(
            signals[&AssetClass::Bonds].to_string(),
            "SELL - Rising rates hurt bond prices"
        );
        assert_eq!(
            signals[&AssetClass::Dollar].to_string(),
            "BUY - Rising rates and growth support USD"
        );
    }

    #[test]
    fn equities_rules() {
        let eq = |gdp_change, rate| {
            let s = set([
                with_change(IndicatorKey::Gdp, 29_000.0, gdp_change),
                with_change(IndicatorKey::Unemployment, rate, 0.0),
            ]);
            compute_signals(&s)[&AssetClass::Equities]
        };
        assert_eq!(eq(2.5, 4.0).action, SignalAction::Buy);
        assert_eq!(eq(-0.1, 4.0).action, SignalAction::Sell);
        assert_eq!(eq(1.0, 7.5).action, SignalAction::Sell);
        assert_eq!(eq(2.0, 4.0).to_string(), "HOLD - Mixed signals");
    }

    #[test]
    fn dollar_rules() {
        let usd = |fed_change, gdp_change| {
            let s = set([
                with_change(IndicatorKey::Gdp, 29_000.0, gdp_change),
                with_change(IndicatorKey::FedFunds, 4.0, fed_change),
            ]);
            compute_signals(&s)[&AssetClass::Dollar]
        };
        assert_eq!(usd(-1.0, 0.5).to_string(), "SELL - Falling rates and weak growth");
        assert_eq!(usd(-1.0, 1.0).action, SignalAction::Hold);
        assert_eq!(usd(1.0, 1.5).action, SignalAction::Hold);
        assert_eq!(usd(0.0, 3.0).to_string(), "HOLD - Neutral conditions");
    }

    #[test]
    fn signals_are_deterministic() {
        let s = set([
            with_change(IndicatorKey::Gdp, 29_000.0, 0.8),
            with_change(IndicatorKey::Unemployment, 4.4, 0.0),
            with_change(IndicatorKey::FedFunds, 5.33, 0.0),
        ]);
        assert_eq!(compute_signals(&s), compute_signals(&s));
        let json = serde_json::to_value(compute_signals(&s)).unwrap();
        assert_eq!(json["bonds"], "HOLD - Stable rates");
        assert_eq!(json["equities"], "HOLD - Mixed signals");
        assert_eq!(json["dollar"], "HOLD - Neutral conditions");
    }
}
