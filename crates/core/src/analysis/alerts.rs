use crate::analysis::format_value;
use crate::domain::indicator::{IndicatorKey, IndicatorSnapshot, SnapshotSet};
use crate::domain::report::{Alert, Severity};
use chrono::{DateTime, Utc};

const SWING_WARNING_PERCENT: f64 = 10.0;
const SWING_CRITICAL_PERCENT: f64 = 20.0;

pub fn compute_alerts(set: &SnapshotSet) -> Vec<Alert> {
    compute_alerts_at(set, Utc::now())
}

/// Scans every indicator in set order. A swing alert, if any, precedes the
/// indicator's threshold alert; both may fire for the same indicator.
///
/// Nothing is remembered between calls, so an unchanged set reissues the same alerts.
pub fn compute_alerts_at(set: &SnapshotSet, timestamp: DateTime<Utc>) -> Vec<Alert> {
    let mut out = Vec::new();

    for snapshot in set.iter() {
        let alert = |severity, message| Alert {
            severity,
            indicator: snapshot.key,
            indicator_name: snapshot.display_name.clone(),
            message,
            timestamp,
        };

        let swing = snapshot.change_percent.abs();
        if swing > SWING_WARNING_PERCENT {
            let severity = if swing > SWING_CRITICAL_PERCENT {
                Severity::Critical
            } else {
                Severity::Warning
            };
            out.push(alert(
                severity,
                format!(
                    "{} changed by {}%",
                    snapshot.display_name,
                    format_value(snapshot.change_percent)
                ),
            ));
        }

        if let Some((severity, message)) = threshold_breach(snapshot) {
            out.push(alert(severity, message));
        }
    }

    out
}

fn threshold_breach(s: &IndicatorSnapshot) -> Option<(Severity, String)> {
    match s.key {
        IndicatorKey::Unemployment if s.latest_value > 7.0 => Some((
            Severity::Critical,
            format!("Unemployment rate high at {}%", format_value(s.latest_value)),
        )),
        IndicatorKey::Inflation if s.change_percent.abs() > 6.0 => Some((
            Severity::Warning,
            format!("High inflation volatility: {}%", format_value(s.change_percent)),
        )),
        IndicatorKey::FedFunds if s.latest_value > 6.0 => Some((
            Severity::Warning,
            format!("Federal funds rate elevated at {}%", format_value(s.latest_value)),
        )),
        IndicatorKey::ConsumerSentiment if s.latest_value < 60.0 => Some((
            Severity::Warning,
            format!("Consumer sentiment low at {}", format_value(s.latest_value)),
        )),
        _ => None,
    }
}
