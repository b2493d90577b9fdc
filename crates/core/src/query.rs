use crate::analysis::{compute_alerts, compute_insight, compute_signals, Signals};
use crate::domain::indicator::{IndicatorKey, IndicatorSnapshot, SnapshotSet};
use crate::domain::report::{Alert, Insight};
use crate::storage::SnapshotStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No snapshot set has been loaded yet.
    DataUnavailable,
    NotFound(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::DataUnavailable => f.write_str("data not available"),
            QueryError::NotFound(name) => write!(f, "indicator {name} not found"),
        }
    }
}

impl std::error::Error for QueryError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub data_available: bool,
    pub indicators: usize,
    pub last_update: Option<DateTime<Utc>>,
}

/// Read side handed to the HTTP layer. Every call works on the set in effect at
/// call time and computes its result fresh.
#[derive(Debug, Clone, Default)]
pub struct QueryService {
    store: SnapshotStore,
}

impl QueryService {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// May be empty before the first refresh.
    pub fn snapshot_set(&self) -> Arc<SnapshotSet> {
        self.store.current()
    }

    pub fn snapshot(&self, name: &str) -> Result<IndicatorSnapshot, QueryError> {
        let key: IndicatorKey = name
            .parse()
            .map_err(|_| QueryError::NotFound(name.to_ascii_uppercase()))?;
        self.store
            .get(key)
            .ok_or_else(|| QueryError::NotFound(key.to_string()))
    }

    pub fn insight(&self) -> Result<Insight, QueryError> {
        let set = self.non_empty_set()?;
        Ok(compute_insight(&set))
    }

    /// An empty set simply has no alerts.
    pub fn alerts(&self) -> Vec<Alert> {
        compute_alerts(&self.store.current())
    }

    pub fn signals(&self) -> Result<Signals, QueryError> {
        let set = self.non_empty_set()?;
        Ok(compute_signals(&set))
    }

    pub fn health(&self) -> HealthReport {
        let set = self.store.current();
        let data_available = !set.is_empty();
        HealthReport {
            status: if data_available {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            timestamp: Utc::now(),
            data_available,
            indicators: set.len(),
            last_update: set.refreshed_at(),
        }
    }

    fn non_empty_set(&self) -> Result<Arc<SnapshotSet>, QueryError> {
        let set = self.store.current();
        if set.is_empty() {
            return Err(QueryError::DataUnavailable);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::fixtures::{set, with_change};
    use crate::domain::report::{AssetClass, HealthLabel, Severity};

    fn loaded() -> QueryService {
        let svc = QueryService::default();
        svc.store().replace(set([
            with_change(IndicatorKey::Unemployment, 7.5, 2.0),
            with_change(IndicatorKey::FedFunds, 6.5, 3.0),
        ]));
        svc
    }

    #[test]
    fn empty_store_is_unavailable() {
        let svc = QueryService::default();
        assert_eq!(svc.insight().unwrap_err(), QueryError::DataUnavailable);
        assert_eq!(svc.signals().unwrap_err(), QueryError::DataUnavailable);
        assert!(svc.alerts().is_empty());
        assert!(svc.snapshot_set().is_empty());

        let health = svc.health();
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(!health.data_available);
        assert!(health.last_update.is_none());
    }

    #[test]
    fn looks_up_indicators_by_name() {
        let svc = loaded();
        assert_eq!(svc.snapshot("unemployment").unwrap().latest_value, 7.5);
        assert_eq!(
            svc.snapshot("gdp").unwrap_err(),
            QueryError::NotFound("GDP".to_string())
        );
        assert_eq!(
            svc.snapshot("payrolls").unwrap_err(),
            QueryError::NotFound("PAYROLLS".to_string())
        );
    }

    #[test]
    fn computes_reports_from_current_set() {
        let svc = loaded();
        let insight = svc.insight().unwrap();
        assert_eq!(insight.economic_health, HealthLabel::Weak);

        let alerts = svc.alerts();
        assert!(alerts
            .iter()
            .any(|a| a.indicator == IndicatorKey::Unemployment && a.severity == Severity::Critical));
        assert!(alerts
            .iter()
            .any(|a| a.indicator == IndicatorKey::FedFunds && a.severity == Severity::Warning));

        let signals = svc.signals().unwrap();
        assert_eq!(signals.keys().copied().collect::<Vec<_>>(), vec![AssetClass::Bonds]);

        let health = svc.health();
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.indicators, 2);
        assert!(health.last_update.is_some());
    }
}
