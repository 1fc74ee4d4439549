//! AquaWatch API Server
//!
//! HTTP surface for submitting water readings, browsing the stored history,
//! and scraping metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod rate_limit;
mod routes;

use alerting::{EmailNotifier, Notifier, UnconfiguredNotifier};
use monitor::MonitorService;
use storage::{CsvRepository, ReadingStore, StorageError};
use water_quality::ValidationError;

use crate::config::{AppConfig, LoggingConfig};
use crate::rate_limit::create_governor_config;

/// Pipeline with its collaborators chosen at startup
pub type Monitor = MonitorService<Box<dyn ReadingStore>, Box<dyn Notifier>>;

/// Application state shared across handlers
pub struct AppState {
    /// Submission pipeline; the lock serializes submissions
    pub monitor: Mutex<Monitor>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus render handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(monitor: Monitor, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            monitor: Mutex::new(monitor),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }

    /// Build the pipeline described by `config`
    pub fn from_config(config: &AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        let store: Box<dyn ReadingStore> = Box::new(CsvRepository::new(&config.storage.path));
        let notifier: Box<dyn Notifier> = match &config.notifications {
            Some(email) => Box::new(EmailNotifier::new(email.clone())),
            None => {
                warn!("No [notifications] settings; alert emails will not be delivered");
                Box::new(UnconfiguredNotifier)
            }
        };
        Self::new(MonitorService::new(store, notifier), metrics)
    }

    /// Run `f` against the pipeline on the blocking pool, one caller at a time
    pub async fn with_monitor<F, T>(self: Arc<Self>, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Monitor) -> T + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let mut monitor = self
                .monitor
                .lock()
                .map_err(|e| ApiError::Internal(format!("monitor lock poisoned: {e}")))?;
            Ok(f(&mut monitor))
        })
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
    }
}

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub readings: Option<usize>,
    pub storage_error: Option<String>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route(
            "/api/v1/readings",
            get(routes::readings::get_history).post(routes::readings::submit_reading),
        )
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let version = state.version.clone();
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let history = state.with_monitor(|monitor| monitor.history()).await?;

    let response = match history {
        Ok(history) => HealthResponse {
            status: "healthy".to_string(),
            version,
            uptime_seconds,
            readings: Some(history.len()),
            storage_error: None,
        },
        Err(e) => HealthResponse {
            status: "degraded".to_string(),
            version,
            uptime_seconds,
            readings: None,
            storage_error: Some(e.to_string()),
        },
    };

    Ok(Json(response))
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);

    if config.json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Run the server
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = PrometheusBuilder::new().install_recorder()?;
    let state = Arc::new(AppState::from_config(&config, Some(metrics)));

    let governor = create_governor_config(&config.rate_limit)
        .ok_or("rate_limit.per_second and rate_limit.burst_size must be non-zero")?;

    let app = create_router(state)
        .layer(GovernorLayer { config: governor })
        .layer(TraceLayer::new_for_http());

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use storage::MemoryRepository;
    use tower::ServiceExt;

    fn app() -> Router {
        let monitor: Monitor = MonitorService::new(
            Box::new(MemoryRepository::new()),
            Box::new(UnconfiguredNotifier),
        );
        create_router(Arc::new(AppState::new(monitor, None)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_reading(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/readings")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn sample(ph: f64) -> Value {
        json!({
            "ph": ph,
            "temperature": 25.0,
            "ammonia": 0.5,
            "nitrite": 0.5,
            "nitrate": 10.0,
            "dissolved_oxygen": 5.0
        })
    }

    #[tokio::test]
    async fn test_submit_nominal_reading() {
        let (status, body) = send(app(), post_reading(sample(7.0))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["evaluation"]["summary"],
            "All parameters are within the ideal range."
        );
        assert_eq!(body["evaluation"]["alerts"], json!([]));
        assert_eq!(body["save"]["status"], "saved");
        assert_eq!(body["notification"]["status"], "skipped");
        assert_eq!(body["messages"], json!(["Data saved successfully!"]));
        assert_eq!(body["evaluation"]["checks"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_submit_violation_reports_undelivered_alert() {
        let (status, body) = send(app(), post_reading(sample(5.5))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["evaluation"]["alerts"],
            json!(["pH out of range! Check the system."])
        );
        assert_eq!(body["evaluation"]["checks"][0]["verdict"]["out_of_range"], "pH is outside the ideal range (6.0-7.5).");
        assert_eq!(body["save"]["status"], "saved");
        assert_eq!(body["notification"]["status"], "failed");
    }

    #[tokio::test]
    async fn test_submit_out_of_domain_is_rejected() {
        let (status, body) = send(app(), post_reading(sample(15.0))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().starts_with("pH value 15"));
    }

    #[tokio::test]
    async fn test_history_limit_keeps_latest() {
        let app = app();
        for ph in [6.5, 7.0, 7.2] {
            let (status, _) = send(app.clone(), post_reading(sample(ph))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(app.clone(), get("/api/v1/readings?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["ph"], 7.0);
        assert_eq!(body["data"][1]["ph"], 7.2);
        assert_eq!(body["columns"][5], "Oxygen");
    }

    #[tokio::test]
    async fn test_health_counts_readings() {
        let app = app();
        send(app.clone(), post_reading(sample(7.0))).await;
        let (status, body) = send(app, get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["readings"], 1);
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let response = app().oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
