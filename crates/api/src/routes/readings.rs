//! Reading Routes

use axum::{
    extract::{Query, State},
    Json,
};
use monitor::SubmissionReport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use water_quality::{validate_sample, Reading, WaterSample};

use crate::{ApiError, AppState};

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Only the most recent `limit` readings
    pub limit: Option<usize>,
}

/// Response for the history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub columns: &'static [&'static str],
    pub data: Vec<Reading>,
    pub count: usize,
    pub total: usize,
}

/// Response for a submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    #[serde(flatten)]
    pub report: SubmissionReport,
    pub messages: Vec<String>,
}

/// Evaluate, store, and alert on one sample
pub async fn submit_reading(
    State(state): State<Arc<AppState>>,
    Json(sample): Json<WaterSample>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    validate_sample(&sample)?;

    let report = state.with_monitor(move |monitor| monitor.submit(sample)).await?;
    info!(
        "Submission processed: {} alert(s), saved = {}",
        report.evaluation.alerts().len(),
        report.saved()
    );

    Ok(Json(SubmissionResponse {
        messages: report.status_messages(),
        report,
    }))
}

/// Stored history, oldest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let history = state.with_monitor(|monitor| monitor.history()).await??;

    let columns = history.columns();
    let total = history.len();
    let mut data = history.into_readings();
    if let Some(limit) = params.limit {
        data = data.split_off(total.saturating_sub(limit));
    }

    Ok(Json(HistoryResponse {
        columns,
        count: data.len(),
        total,
        data,
    }))
}
