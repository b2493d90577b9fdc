use crate::domain::indicator::{IndicatorKey, IndicatorSnapshot, SnapshotSet};
use crate::ingest::provider::DataSource;
use chrono::Utc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorConfig {
    pub key: IndicatorKey,
    pub series_id: &'static str,
    pub display_name: &'static str,
}

impl IndicatorConfig {
    pub fn for_key(key: IndicatorKey) -> Self {
        let (series_id, display_name) = match key {
            IndicatorKey::Gdp => ("GDP", "Gross Domestic Product"),
            IndicatorKey::Unemployment => ("UNRATE", "Unemployment Rate"),
            IndicatorKey::Inflation => ("CPIAUCSL", "Consumer Price Index"),
            IndicatorKey::FedFunds => ("FEDFUNDS", "Federal Funds Rate"),
            IndicatorKey::ConsumerSentiment => ("UMCSENT", "Consumer Sentiment"),
        };
        Self {
            key,
            series_id,
            display_name,
        }
    }
}

/// Every tracked indicator, in catalogue order.
pub fn default_indicators() -> Vec<IndicatorConfig> {
    IndicatorKey::ALL
        .into_iter()
        .map(IndicatorConfig::for_key)
        .collect()
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub set: SnapshotSet,
    pub failed: Vec<IndicatorKey>,
}

impl RefreshOutcome {
    /// True when nothing at all could be fetched.
    pub fn is_total_failure(&self) -> bool {
        self.set.is_empty() && !self.failed.is_empty()
    }
}

/// Fetches every configured indicator once. A failed indicator is logged and
/// left out of the resulting set; the cycle itself never fails.
pub async fn refresh_snapshot_set(
    source: &dyn DataSource,
    indicators: &[IndicatorConfig],
    limit: u32,
) -> RefreshOutcome {
    let mut snapshots = Vec::with_capacity(indicators.len());
    let mut failed = Vec::new();

    for cfg in indicators {
        match source.fetch_latest(cfg.series_id, limit).await {
            // Derived fields are recomputed from the raw pair.
            Ok(obs) => snapshots.push(IndicatorSnapshot::new(
                cfg.key,
                cfg.series_id,
                cfg.display_name,
                obs.latest_value,
                obs.previous_value,
                obs.date,
            )),
            Err(err) => {
                tracing::warn!(
                    key = %cfg.key,
                    series_id = cfg.series_id,
                    source = source.source_name(),
                    error = %format!("{err:#}"),
                    "indicator fetch failed; excluding from snapshot set"
                );
                failed.push(cfg.key);
            }
        }
    }

    let set = SnapshotSet::new(Utc::now(), snapshots);
    tracing::info!(
        fetched = set.len(),
        failed = failed.len(),
        source = source.source_name(),
        "refresh cycle complete"
    );

    RefreshOutcome { set, failed }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeSource;
    use super::*;
    use crate::domain::indicator::Trend;

    #[test]
    fn catalogue_covers_every_key_in_order() {
        let cfgs = default_indicators();
        let keys: Vec<_> = cfgs.iter().map(|c| c.key).collect();
        assert_eq!(keys, IndicatorKey::ALL.to_vec());
        assert_eq!(cfgs[1].series_id, "UNRATE");
        assert_eq!(cfgs[3].display_name, "Federal Funds Rate");
    }

    #[tokio::test]
    async fn builds_snapshots_for_fetched_indicators() {
        let source = FakeSource::with(&[("UNRATE", 4.4, 4.2), ("FEDFUNDS", 5.33, 5.33)]);
        let outcome = refresh_snapshot_set(&source, &default_indicators(), 10).await;

        assert_eq!(outcome.set.len(), 2);
        assert_eq!(
            outcome.failed,
            vec![IndicatorKey::Gdp, IndicatorKey::Inflation, IndicatorKey::ConsumerSentiment]
        );
        assert!(!outcome.is_total_failure());

        let unemployment = outcome.set.get(IndicatorKey::Unemployment).unwrap();
        assert_eq!(unemployment.display_name, "Unemployment Rate");
        assert_eq!(unemployment.change_percent, 4.76);
        assert_eq!(unemployment.trend, Trend::Up);
        assert_eq!(
            outcome.set.get(IndicatorKey::FedFunds).unwrap().trend,
            Trend::Stable
        );
        assert!(outcome.set.refreshed_at().is_some());
    }

    struct SkewedSource;

    #[async_trait::async_trait]
    impl DataSource for SkewedSource {
        fn source_name(&self) -> &'static str {
            "skewed"
        }

        async fn fetch_latest(
            &self,
            _series_id: &str,
            _limit: u32,
        ) -> anyhow::Result<crate::ingest::types::LatestObservation> {
            Ok(crate::ingest::types::LatestObservation {
                latest_value: 90.0,
                previous_value: 100.0,
                date: "2026-09-01".to_string(),
                change_percent: 3.0,
                trend: Trend::Up,
            })
        }
    }

    #[tokio::test]
    async fn snapshot_fields_are_derived_from_values_not_source() {
        let indicators = [IndicatorConfig::for_key(IndicatorKey::ConsumerSentiment)];
        let outcome = refresh_snapshot_set(&SkewedSource, &indicators, 10).await;

        let s = outcome.set.get(IndicatorKey::ConsumerSentiment).unwrap();
        assert_eq!(s.change_percent, -10.0);
        assert_eq!(s.trend, Trend::Down);
    }

    #[tokio::test]
    async fn all_failures_is_a_total_failure() {
        let outcome = refresh_snapshot_set(&FakeSource::default(), &default_indicators(), 10).await;
        assert!(outcome.set.is_empty());
        assert!(outcome.is_total_failure());
    }
}
