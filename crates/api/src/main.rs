use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use macromind_core::analysis::Signals;
use macromind_core::domain::indicator::{IndicatorSnapshot, SnapshotSet};
use macromind_core::domain::report::{Alert, Insight};
use macromind_core::ingest::provider::{DataSource, FredClient};
use macromind_core::ingest::refresh::default_indicators;
use macromind_core::query::{HealthReport, QueryError, QueryService};
use macromind_core::storage::snapshot_store::run_refresh_service;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = macromind_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let query = QueryService::default();

    let addr = format!("{}:{}", settings.api_host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // The first refresh runs in the background; queries answer 503 until it lands.
    match FredClient::from_settings(&settings) {
        Ok(client) => {
            let source: Arc<dyn DataSource> = Arc::new(client);
            tokio::spawn(run_refresh_service(
                query.store().clone(),
                source,
                default_indicators(),
                settings.observation_limit,
                settings.refresh_interval(),
            ));
        }
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "data source unavailable; starting API in degraded mode");
        }
    }

    let app = router(AppState { query });

    tracing::info!(%addr, "api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Debug, Clone)]
struct AppState {
    query: QueryService,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/api/health", get(health))
        .route("/api/indicators", get(get_indicators))
        .route("/api/indicators/:name", get(get_indicator))
        .route("/api/insights", get(get_insights))
        .route("/api/alerts", get(get_alerts))
        .route("/api/signals", get(get_signals))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "MacroMind API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn healthz() -> &'static str {
    "ok"
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.query.health())
}

async fn get_indicators(State(state): State<AppState>) -> Result<Json<SnapshotSet>, StatusCode> {
    let set = state.query.snapshot_set();
    if set.is_empty() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(SnapshotSet::clone(&set)))
}

async fn get_indicator(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<IndicatorSnapshot>, StatusCode> {
    let snapshot = state.query.snapshot(&name).map_err(status_for)?;
    Ok(Json(snapshot))
}

async fn get_insights(State(state): State<AppState>) -> Result<Json<Insight>, StatusCode> {
    let insight = state.query.insight().map_err(status_for)?;
    Ok(Json(insight))
}

async fn get_alerts(State(state): State<AppState>) -> Json<Vec<Alert>> {
    Json(state.query.alerts())
}

async fn get_signals(State(state): State<AppState>) -> Result<Json<Signals>, StatusCode> {
    let signals = state.query.signals().map_err(status_for)?;
    Ok(Json(signals))
}

fn status_for(err: QueryError) -> StatusCode {
    tracing::debug!(error = %err, "query rejected");
    match err {
        QueryError::DataUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        QueryError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
