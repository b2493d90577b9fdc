use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Changes inside this band (in percent) count as flat.
pub const TREND_DEADBAND_PERCENT: f64 = 0.1;

/// The closed set of tracked indicators.
///
/// Declaration order is the canonical iteration order of a [`SnapshotSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKey {
    Gdp,
    Unemployment,
    Inflation,
    FedFunds,
    ConsumerSentiment,
}

impl IndicatorKey {
    pub const ALL: [IndicatorKey; 5] = [
        IndicatorKey::Gdp,
        IndicatorKey::Unemployment,
        IndicatorKey::Inflation,
        IndicatorKey::FedFunds,
        IndicatorKey::ConsumerSentiment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorKey::Gdp => "GDP",
            IndicatorKey::Unemployment => "UNEMPLOYMENT",
            IndicatorKey::Inflation => "INFLATION",
            IndicatorKey::FedFunds => "FED_FUNDS",
            IndicatorKey::ConsumerSentiment => "CONSUMER_SENTIMENT",
        }
    }
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIndicator(pub String);

impl fmt::Display for UnknownIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown indicator: {}", self.0)
    }
}

impl std::error::Error for UnknownIndicator {}

impl FromStr for IndicatorKey {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        IndicatorKey::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| UnknownIndicator(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn from_change_percent(change_percent: f64) -> Self {
        if change_percent > TREND_DEADBAND_PERCENT {
            Trend::Up
        } else if change_percent < -TREND_DEADBAND_PERCENT {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

/// Percent change from `previous` to `latest`, rounded to two decimals.
///
/// A zero `previous` yields `0.0` rather than an error. That hides a bad
/// previous observation, but callers rely on it being total.
pub fn change_percent(latest: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    round2((latest - previous) / previous * 100.0)
}

// Exact ties go to the even cent, so 0.125 becomes 0.12.
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub key: IndicatorKey,
    pub series_id: String,
    pub display_name: String,
    pub latest_value: f64,
    pub previous_value: f64,
    pub change_percent: f64,
    /// Observation date exactly as the source reported it.
    pub observed_date: String,
    pub trend: Trend,
}

impl IndicatorSnapshot {
    pub fn new(
        key: IndicatorKey,
        series_id: impl Into<String>,
        display_name: impl Into<String>,
        latest_value: f64,
        previous_value: f64,
        observed_date: impl Into<String>,
    ) -> Self {
        let change_percent = change_percent(latest_value, previous_value);
        Self {
            key,
            series_id: series_id.into(),
            display_name: display_name.into(),
            latest_value,
            previous_value,
            change_percent,
            observed_date: observed_date.into(),
            trend: Trend::from_change_percent(change_percent),
        }
    }
}

/// Latest snapshot per indicator, produced by one refresh cycle and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotSet {
    #[serde(skip)]
    refreshed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    snapshots: BTreeMap<IndicatorKey, IndicatorSnapshot>,
}

impl SnapshotSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Later snapshots for the same key win.
    pub fn new(
        refreshed_at: DateTime<Utc>,
        snapshots: impl IntoIterator<Item = IndicatorSnapshot>,
    ) -> Self {
        Self {
            refreshed_at: Some(refreshed_at),
            snapshots: snapshots.into_iter().map(|s| (s.key, s)).collect(),
        }
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn get(&self, key: IndicatorKey) -> Option<&IndicatorSnapshot> {
        self.snapshots.get(&key)
    }

    pub fn contains(&self, key: IndicatorKey) -> bool {
        self.snapshots.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorSnapshot> {
        self.snapshots.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = IndicatorKey> + '_ {
        self.snapshots.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
