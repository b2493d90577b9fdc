use crate::analysis::format_value;
use crate::analysis::scoring::SubScores;
use crate::domain::indicator::{IndicatorKey, SnapshotSet, Trend};
use crate::domain::report::{HealthLabel, Insight};
use chrono::{DateTime, Utc};

/// How many concerns / opportunities the summary quotes.
const SUMMARY_ITEMS: usize = 2;

pub fn compute_insight(set: &SnapshotSet) -> Insight {
    compute_insight_at(set, Utc::now())
}

pub fn compute_insight_at(set: &SnapshotSet, timestamp: DateTime<Utc>) -> Insight {
    let overall_score = SubScores::from_set(set).overall();
    let economic_health = HealthLabel::from_score(overall_score);

    let key_concerns = identify_concerns(set);
    let opportunities = identify_opportunities(set);
    let summary = summarize(economic_health, set, &key_concerns, &opportunities);

    Insight {
        timestamp,
        economic_health,
        key_concerns,
        opportunities,
        confidence: (overall_score / 10.0).min(1.0),
        overall_score,
        summary,
    }
}

pub fn identify_concerns(set: &SnapshotSet) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(unemployment) = set.get(IndicatorKey::Unemployment) {
        if unemployment.latest_value > 6.0 {
            out.push(format!(
                "High unemployment at {}%",
                format_value(unemployment.latest_value)
            ));
        } else if unemployment.trend == Trend::Up {
            out.push("Rising unemployment trend".to_string());
        }
    }

    if let Some(inflation) = set.get(IndicatorKey::Inflation) {
        if inflation.change_percent.abs() > 5.0 {
            out.push(format!(
                "High inflation volatility: {}%",
                format_value(inflation.change_percent)
            ));
        }
    }

    if let Some(gdp) = set.get(IndicatorKey::Gdp) {
        if gdp.change_percent < 0.0 {
            out.push("Negative GDP growth".to_string());
        }
    }

    if let Some(sentiment) = set.get(IndicatorKey::ConsumerSentiment) {
        if sentiment.latest_value < 70.0 {
            out.push("Low consumer confidence".to_string());
        }
    }

    if let Some(fed_funds) = set.get(IndicatorKey::FedFunds) {
        if fed_funds.latest_value > 6.0 {
            out.push("High interest rates constraining growth".to_string());
        }
    }

    out
}

pub fn identify_opportunities(set: &SnapshotSet) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(unemployment) = set.get(IndicatorKey::Unemployment) {
        if unemployment.latest_value < 4.0 {
            out.push("Strong labor market supports consumer spending");
        } else if unemployment.trend == Trend::Down {
            out.push("Improving employment conditions");
        }
    }

    if let Some(fed_funds) = set.get(IndicatorKey::FedFunds) {
        if fed_funds.trend == Trend::Down {
            out.push("Easing monetary policy supports growth");
        } else if fed_funds.latest_value < 3.0 {
            out.push("Low interest rates support investment");
        }
    }

    if let Some(sentiment) = set.get(IndicatorKey::ConsumerSentiment) {
        if sentiment.trend == Trend::Up {
            out.push("Improving consumer confidence");
        } else if sentiment.latest_value > 90.0 {
            out.push("High consumer confidence drives spending");
        }
    }

    if let Some(gdp) = set.get(IndicatorKey::Gdp) {
        if gdp.change_percent > 2.5 {
            out.push("Strong economic growth momentum");
        }
    }

    if let Some(inflation) = set.get(IndicatorKey::Inflation) {
        if inflation.change_percent.abs() < 2.0 {
            out.push("Stable inflation supports economic planning");
        }
    }

    out.into_iter().map(String::from).collect()
}

fn summarize(
    health: HealthLabel,
    set: &SnapshotSet,
    concerns: &[String],
    opportunities: &[String],
) -> String {
    let mut parts = vec![format!("Economic health is currently {health}.")];

    if !concerns.is_empty() {
        parts.push(format!(
            "Key concerns include: {}.",
            first_items(concerns)
        ));
    }

    if !opportunities.is_empty() {
        parts.push(format!("Opportunities: {}.", first_items(opportunities)));
    }

    let context: Vec<String> = [
        (IndicatorKey::Unemployment, "unemployment"),
        (IndicatorKey::Inflation, "inflation trend"),
        (IndicatorKey::FedFunds, "fed funds rate"),
    ]
    .into_iter()
    .filter_map(|(key, label)| {
        let s = set.get(key)?;
        // Inflation is reported as its move, the others as levels.
        let value = if key == IndicatorKey::Inflation {
            s.change_percent
        } else {
            s.latest_value
        };
        Some(format!("{label} at {}%", format_value(value)))
    })
    .collect();

    if !context.is_empty() {
        parts.push(format!("Current conditions: {}.", context.join(", ")));
    }

    parts.join(" ")
}

fn first_items(items: &[String]) -> String {
    items[..items.len().min(SUMMARY_ITEMS)].join(", ")
}
