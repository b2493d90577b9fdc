use anyhow::Context;
use clap::Parser;
use macromind_core::ingest::provider::FredClient;
use macromind_core::storage::SnapshotStore;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

#[derive(Debug, Parser)]
#[command(name = "macromind_worker")]
struct Args {
    /// Indicator keys to fetch (e.g. GDP, FED_FUNDS). Defaults to every tracked indicator.
    #[arg(long = "indicator", value_name = "KEY")]
    indicators: Vec<String>,

    /// Number of observations to request per series. Overrides FRED_OBSERVATION_LIMIT.
    #[arg(long)]
    limit: Option<u32>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = macromind_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let indicators = report::select_indicators(&args.indicators)?;
    let limit = args.limit.unwrap_or(settings.observation_limit);
    let client = FredClient::from_settings(&settings)?;

    let store = SnapshotStore::new();
    let outcome = store.refresh_once(&client, &indicators, limit).await;
    if outcome.is_total_failure() {
        let err = anyhow::anyhow!("no indicator could be fetched ({} failed)", outcome.failed.len());
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "refresh produced no data");
    }

    let report = report::Report::build(&store.current(), chrono::Utc::now());
    let json = if args.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .context("failed to serialize report")?;
    println!("{json}");

    tracing::info!(
        indicators = indicators.len(),
        fetched = outcome.set.len(),
        failed = outcome.failed.len(),
        "worker run finished"
    );
    Ok(())
}

fn init_sentry(settings: &macromind_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
