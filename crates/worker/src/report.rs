use chrono::{DateTime, Utc};
use macromind_core::analysis::{compute_alerts_at, compute_insight_at, compute_signals, Signals};
use macromind_core::domain::indicator::{IndicatorKey, SnapshotSet};
use macromind_core::domain::report::{Alert, Insight};
use macromind_core::ingest::refresh::{default_indicators, IndicatorConfig};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub snapshot_set: SnapshotSet,
    pub insight: Insight,
    pub alerts: Vec<Alert>,
    pub signals: Signals,
}

impl Report {
    pub fn build(set: &SnapshotSet, now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            snapshot_set: set.clone(),
            insight: compute_insight_at(set, now),
            alerts: compute_alerts_at(set, now),
            signals: compute_signals(set),
        }
    }
}

/// Resolves `--indicator` arguments; none means the full catalogue.
pub fn select_indicators(keys: &[String]) -> anyhow::Result<Vec<IndicatorConfig>> {
    if keys.is_empty() {
        return Ok(default_indicators());
    }

    let mut parsed = keys
        .iter()
        .map(|k| k.parse::<IndicatorKey>())
        .collect::<Result<Vec<_>, _>>()?;
    parsed.sort();
    parsed.dedup();

    Ok(parsed.into_iter().map(IndicatorConfig::for_key).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use macromind_core::domain::indicator::IndicatorSnapshot;

    #[test]
    fn no_arguments_selects_everything() {
        assert_eq!(select_indicators(&[]).unwrap(), default_indicators());
    }

    #[test]
    fn selection_is_deduplicated_in_catalogue_order() {
        let keys = ["fed_funds", "GDP", "FED_FUNDS"].map(String::from);
        let picked = select_indicators(&keys).unwrap();
        let ids: Vec<_> = picked.iter().map(|c| c.series_id).collect();
        assert_eq!(ids, vec!["GDP", "FEDFUNDS"]);
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = select_indicators(&["CPI".to_string()]).unwrap_err();
        assert!(err.to_string().contains("CPI"));
    }

    #[test]
    fn report_bundles_all_views() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let set = SnapshotSet::new(
            now,
            [IndicatorSnapshot::new(
                IndicatorKey::FedFunds,
                "FEDFUNDS",
                "Federal Funds Rate",
                4.1,
                4.3,
                "2026-09-01",
            )],
        );

        let report = Report::build(&set, now);
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["snapshot_set"]["FED_FUNDS"]["trend"], "down");
        assert_eq!(v["signals"]["bonds"], "BUY - Falling rates support bond prices");
        assert_eq!(v["insight"]["economic_health"], "strong");
        assert_eq!(v["alerts"], serde_json::json!([]));
    }
}
