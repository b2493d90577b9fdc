use crate::domain::indicator::IndicatorKey;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLabel {
    Strong,
    Moderate,
    Weak,
}

impl HealthLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            HealthLabel::Strong
        } else if score >= 5.0 {
            HealthLabel::Moderate
        } else {
            HealthLabel::Weak
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthLabel::Strong => "strong",
            HealthLabel::Moderate => "moderate",
            HealthLabel::Weak => "weak",
        }
    }
}

impl fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative read of a snapshot set. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub timestamp: DateTime<Utc>,
    pub economic_health: HealthLabel,
    pub key_concerns: Vec<String>,
    pub opportunities: Vec<String>,
    pub confidence: f64,
    pub overall_score: f64,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub indicator: IndicatorKey,
    pub indicator_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Bonds,
    Equities,
    Dollar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl SignalAction {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
            SignalAction::Hold => "HOLD",
        }
    }
}

/// Advisory call for one asset class, rendered as `"<ACTION> - <rationale>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub action: SignalAction,
    pub rationale: &'static str,
}

impl Signal {
    pub const fn new(action: SignalAction, rationale: &'static str) -> Self {
        Self { action, rationale }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.action.as_str(), self.rationale)
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_label_thresholds() {
        assert_eq!(HealthLabel::from_score(7.0), HealthLabel::Strong);
        assert_eq!(HealthLabel::from_score(6.99), HealthLabel::Moderate);
        assert_eq!(HealthLabel::from_score(5.0), HealthLabel::Moderate);
        assert_eq!(HealthLabel::from_score(4.99), HealthLabel::Weak);
    }

    #[test]
    fn signal_serializes_as_action_and_rationale() {
        let s = Signal::new(SignalAction::Hold, "Stable rates");
        assert_eq!(serde_json::to_value(s).unwrap(), "HOLD - Stable rates");
    }
}
