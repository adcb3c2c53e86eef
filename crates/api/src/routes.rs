use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use extract::{Extractor, TransactionRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use store::{DashboardData, JsonStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};

pub struct AppState {
    pub extractor: Extractor,
    pub store: JsonStore,
    pub metrics: Arc<Metrics>,
}

#[derive(Serialize)]
struct HealthResponse {
    llm: String,
    store: String,
}

#[derive(Deserialize)]
pub struct ExtractRequest {
    /// Free-text bank notification
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub record: TransactionRecord,
    pub reply: String,
    pub total_records: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/extract", post(extract_transaction))
        .route("/transactions", get(list_transactions))
        .route("/api/dashboard-data", get(dashboard_data))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let llm_status = match state.extractor.llm_client().ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {:#}", e),
    };

    let store_status = match state.store.load().await {
        Ok(records) => format!("ok ({} records)", records.len()),
        Err(e) => format!("error: {:#}", e),
    };

    Json(HealthResponse {
        llm: llm_status,
        store: store_status,
    })
}

async fn extract_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, StatusCode> {
    if req.text.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let timer = TimedOperation::start();

    let extraction = match state.extractor.extract_from_text(&req.text).await {
        Ok(extraction) => extraction,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Extraction error");
            state.metrics.record_request(false);
            return Err(StatusCode::BAD_GATEWAY);
        }
    };

    let total_records = match state.store.append(&extraction.record).await {
        Ok(total) => total,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Store error");
            state.metrics.record_request(false);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    state.metrics.record_extract(timer.elapsed());
    state.metrics.record_request(true);

    Ok(Json(ExtractResponse {
        record: extraction.record,
        reply: extraction.reply,
        total_records,
    }))
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let records = state.store.load().await.map_err(|e| {
        error!(error = %format!("{:#}", e), "Store error");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(records))
}

async fn dashboard_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardData>, StatusCode> {
    let records = state.store.load().await.map_err(|e| {
        error!(error = %format!("{:#}", e), "Store error");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let data = store::build_dashboard(&records).map_err(|e| {
        error!(error = %format!("{:#}", e), "Dashboard error");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(data))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
