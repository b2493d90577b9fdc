use crate::domain::indicator::Trend;
use serde::{Deserialize, Serialize};

/// FRED `series/observations` response, newest first when requested with `sort_order=desc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationsResponse {
    #[serde(default)]
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub date: String,
    /// Numeric text, or `"."` when the value is missing.
    pub value: String,
}

/// The two most recent readings of a series plus the fields derived from them.
///
/// `change_percent` and `trend` are informational. The refresh pipeline keeps only
/// the two values and the date, and [`IndicatorSnapshot::new`] derives the rest, so
/// the trend rule lives in one place.
///
/// [`IndicatorSnapshot::new`]: crate::domain::indicator::IndicatorSnapshot::new
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestObservation {
    pub latest_value: f64,
    pub previous_value: f64,
    pub date: String,
    pub change_percent: f64,
    pub trend: Trend,
}
