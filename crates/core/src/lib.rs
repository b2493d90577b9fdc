pub mod analysis;
pub mod domain;
pub mod ingest;
pub mod query;
pub mod storage;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_RETRIES: u32 = 3;
    const DEFAULT_OBSERVATION_LIMIT: u32 = 10;
    const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;
    const DEFAULT_API_HOST: &str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub fred_api_key: Option<String>,
        pub fred_base_url: String,
        pub fred_timeout_secs: u64,
        pub fred_retries: u32,
        pub observation_limit: u32,
        pub refresh_interval_secs: u64,
        pub api_host: String,
        pub port: u16,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                fred_api_key: None,
                fred_base_url: DEFAULT_FRED_BASE_URL.to_string(),
                fred_timeout_secs: DEFAULT_TIMEOUT_SECS,
                fred_retries: DEFAULT_RETRIES,
                observation_limit: DEFAULT_OBSERVATION_LIMIT,
                refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
                api_host: DEFAULT_API_HOST.to_string(),
                port: DEFAULT_PORT,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|name| std::env::var(name).ok())
        }

        /// Builds settings from an arbitrary variable lookup; blank values count as unset.
        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
            let defaults = Self::default();

            Ok(Self {
                fred_api_key: get("FRED_API_KEY"),
                fred_base_url: get("FRED_BASE_URL").unwrap_or(defaults.fred_base_url),
                fred_timeout_secs: parse_or(get("FRED_TIMEOUT_SECS"), "FRED_TIMEOUT_SECS", defaults.fred_timeout_secs)?,
                fred_retries: parse_or(get("FRED_RETRIES"), "FRED_RETRIES", defaults.fred_retries)?,
                observation_limit: parse_or(
                    get("FRED_OBSERVATION_LIMIT"),
                    "FRED_OBSERVATION_LIMIT",
                    defaults.observation_limit,
                )?,
                refresh_interval_secs: parse_or(
                    get("REFRESH_INTERVAL_SECS"),
                    "REFRESH_INTERVAL_SECS",
                    defaults.refresh_interval_secs,
                )?,
                api_host: get("API_HOST").unwrap_or(defaults.api_host),
                port: parse_or(get("PORT"), "PORT", defaults.port)?,
                sentry_dsn: get("SENTRY_DSN"),
            })
        }

        pub fn require_fred_api_key(&self) -> anyhow::Result<&str> {
            self.fred_api_key
                .as_deref()
                .context("FRED_API_KEY is required")
        }

        pub fn refresh_interval(&self) -> Duration {
            Duration::from_secs(self.refresh_interval_secs.max(1))
        }
    }

    fn parse_or<T>(raw: Option<String>, name: &str, default: T) -> anyhow::Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match raw {
            Some(v) => v
                .trim()
                .parse::<T>()
                .with_context(|| format!("{name} must be a valid number (got {v:?})")),
            None => Ok(default),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            move |name: &str| map.get(name).cloned()
        }

        #[test]
        fn defaults_apply_when_unset() {
            let s = Settings::from_lookup(lookup(&[])).unwrap();
            assert_eq!(s.fred_base_url, "https://api.stlouisfed.org/fred");
            assert_eq!(s.observation_limit, 10);
            assert_eq!(s.refresh_interval(), Duration::from_secs(3600));
            assert_eq!(s.port, 8000);
            assert!(s.require_fred_api_key().is_err());
        }

        #[test]
        fn reads_overrides_and_ignores_blank_values() {
            let s = Settings::from_lookup(lookup(&[
                ("FRED_API_KEY", "abc"),
                ("PORT", "9100"),
                ("REFRESH_INTERVAL_SECS", "60"),
                ("SENTRY_DSN", "   "),
            ]))
            .unwrap();
            assert_eq!(s.require_fred_api_key().unwrap(), "abc");
            assert_eq!(s.port, 9100);
            assert_eq!(s.refresh_interval(), Duration::from_secs(60));
            assert!(s.sentry_dsn.is_none());
        }

        #[test]
        fn rejects_malformed_numbers() {
            let err = Settings::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
            assert!(err.to_string().contains("PORT"));
        }
    }
}
