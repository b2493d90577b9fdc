//! Per-category health sub-scores on a 0–10 scale.
//!
//! Every scorer returns `None` when its indicator is missing; an absent score is
//! left out of the aggregate rather than counted as zero.

use crate::domain::indicator::{IndicatorKey, IndicatorSnapshot, SnapshotSet, Trend};

/// Score used when no sub-score is available at all.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Unemployment rate: lower is better.
pub fn score_employment(unemployment: Option<&IndicatorSnapshot>) -> Option<f64> {
    let rate = unemployment?.latest_value;
    let score = if rate <= 3.5 {
        10.0
    } else if rate <= 4.5 {
        8.0
    } else if rate <= 6.0 {
        6.0
    } else if rate <= 8.0 {
        4.0
    } else {
        2.0
    };
    Some(score)
}

/// Price-index volatility: size of the last move regardless of direction.
pub fn score_inflation(cpi: Option<&IndicatorSnapshot>) -> Option<f64> {
    let change = cpi?.change_percent.abs();
    let score = if change <= 2.5 {
        9.0
    } else if change <= 4.0 {
        7.0
    } else if change <= 6.0 {
        5.0
    } else {
        3.0
    };
    Some(score)
}

pub fn score_growth(gdp: Option<&IndicatorSnapshot>) -> Option<f64> {
    let change = gdp?.change_percent;
    let score = if change >= 3.0 {
        9.0
    } else if change >= 2.0 {
        7.0
    } else if change >= 1.0 {
        6.0
    } else if change >= 0.0 {
        4.0
    } else {
        2.0
    };
    Some(score)
}

pub fn score_sentiment(sentiment: Option<&IndicatorSnapshot>) -> Option<f64> {
    let value = sentiment?.latest_value;
    let score = if value >= 100.0 {
        9.0
    } else if value >= 90.0 {
        7.0
    } else if value >= 80.0 {
        6.0
    } else if value >= 70.0 {
        4.0
    } else {
        3.0
    };
    Some(score)
}

/// Policy stance from the fed funds level and its direction.
pub fn score_monetary_policy(fed_funds: Option<&IndicatorSnapshot>) -> Option<f64> {
    let fed_funds = fed_funds?;
    let rate = fed_funds.latest_value;
    let score = match fed_funds.trend {
        Trend::Stable if rate <= 2.0 => 8.0,
        Trend::Up if rate <= 5.0 => 6.0,
        _ if rate > 5.0 => 4.0,
        _ => 7.0,
    };
    Some(score)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub employment: Option<f64>,
    pub inflation: Option<f64>,
    pub growth: Option<f64>,
    pub sentiment: Option<f64>,
    pub monetary: Option<f64>,
}

impl SubScores {
    pub fn from_set(set: &SnapshotSet) -> Self {
        Self {
            employment: score_employment(set.get(IndicatorKey::Unemployment)),
            inflation: score_inflation(set.get(IndicatorKey::Inflation)),
            growth: score_growth(set.get(IndicatorKey::Gdp)),
            sentiment: score_sentiment(set.get(IndicatorKey::ConsumerSentiment)),
            monetary: score_monetary_policy(set.get(IndicatorKey::FedFunds)),
        }
    }

    pub fn present(&self) -> impl Iterator<Item = f64> {
        [
            self.employment,
            self.inflation,
            self.growth,
            self.sentiment,
            self.monetary,
        ]
        .into_iter()
        .flatten()
    }

    /// Mean of the present sub-scores, or [`NEUTRAL_SCORE`] when there are none.
    pub fn overall(&self) -> f64 {
        let (sum, n) = self.present().fold((0.0, 0u32), |(s, n), v| (s + v, n + 1));
        if n == 0 {
            NEUTRAL_SCORE
        } else {
            sum / f64::from(n)
        }
    }
}
