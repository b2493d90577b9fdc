use crate::config::Settings;
use crate::domain::indicator::{change_percent, Trend};
use crate::ingest::types::{LatestObservation, Observation, ObservationsResponse};
use anyhow::{Context, Result};
use std::time::Duration;

const OBSERVATIONS_PATH: &str = "/series/observations";
const MISSING_VALUE: &str = ".";
// Caps the retry backoff at 64s.
const MAX_BACKOFF_SHIFT: u32 = 6;

/// A source of the latest observations for a statistical series.
///
/// Any failure, including a series with fewer than two observations, is an `Err`.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_latest(&self, series_id: &str, limit: u32) -> Result<LatestObservation>;
}

#[derive(Debug, Clone)]
pub struct FredClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retries: u32,
}

impl FredClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_fred_api_key()?.to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.fred_timeout_secs))
            .build()
            .context("failed to build FRED http client")?;

        Ok(Self {
            http,
            base_url: settings.fred_base_url.clone(),
            api_key,
            retries: settings.fred_retries.max(1),
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), OBSERVATIONS_PATH)
    }

    async fn fetch_once(&self, series_id: &str, limit: u32) -> Result<ObservationsResponse> {
        let limit = limit.to_string();
        let res = self
            .http
            .get(self.url())
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("limit", limit.as_str()),
                ("sort_order", "desc"),
            ])
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("FRED request failed for {series_id}"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("failed to read FRED response")?;

        if !status.is_success() {
            anyhow::bail!("FRED HTTP {status} for {series_id}: {text}");
        }

        serde_json::from_str::<ObservationsResponse>(&text)
            .with_context(|| format!("FRED response for {series_id} is not an observations payload"))
    }
}

#[async_trait::async_trait]
impl DataSource for FredClient {
    fn source_name(&self) -> &'static str {
        "fred"
    }

    async fn fetch_latest(&self, series_id: &str, limit: u32) -> Result<LatestObservation> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(series_id, limit).await {
                Ok(resp) => return latest_from_observations(series_id, &resp.observations),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = backoff_for(attempt);
                    tracing::warn!(series_id, attempt, ?backoff, error = %err, "FRED fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

fn backoff_for(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT))
}

/// Reduces newest-first observations to the latest/previous pair.
pub fn latest_from_observations(
    series_id: &str,
    observations: &[Observation],
) -> Result<LatestObservation> {
    let [latest, previous, ..] = observations else {
        anyhow::bail!(
            "series {series_id} returned {} observation(s); need at least 2",
            observations.len()
        );
    };

    let latest_value = parse_value(&latest.value)
        .with_context(|| format!("bad latest value for {series_id}"))?;
    let previous_value = parse_value(&previous.value)
        .with_context(|| format!("bad previous value for {series_id}"))?;
    let change_percent = change_percent(latest_value, previous_value);

    Ok(LatestObservation {
        latest_value,
        previous_value,
        date: latest.date.clone(),
        change_percent,
        trend: Trend::from_change_percent(change_percent),
    })
}

// FRED marks missing readings with "."; those count as zero.
fn parse_value(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw == MISSING_VALUE {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .with_context(|| format!("observation value is not numeric: {raw:?}"))
}
