//! HTTP route handlers for the ENCLOSE diagnostic API.

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use sha2::{Digest, Sha256};

use super::engine;
use super::models::{DiagnoseResponse, DivePerformanceData};

const TOOL_NAME: &str = "enclose-diagnose";
const TOOL_VERSION: &str = "0.1.0";

/// Compute SHA256 hash of input string.
fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let digest = hasher.finalize();
    format!("sha256:{}", hex::encode(digest))
}

/// Create the ENCLOSE router with all endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/diagnose", post(diagnose))
}

/// Health check for the diagnostic engine.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "enclose-engine",
        "version": TOOL_VERSION
    }))
}

/// Diagnose one dive's performance data.
///
/// An empty assessment list means no problems were detected; it is never an
/// error. Malformed bodies are rejected by the JSON extractor before this
/// handler runs.
async fn diagnose(Json(data): Json<DivePerformanceData>) -> Json<DiagnoseResponse> {
    // Serialize the parsed request for the audit hash.
    let input_json = serde_json::to_string(&data).unwrap_or_default();
    let input_hash = sha256_hex(&input_json);

    let assessments = engine::diagnose(&data);
    tracing::debug!(
        count = assessments.len(),
        reached_depth_m = data.reached_depth_m,
        "enclose diagnosis complete"
    );

    Json(DiagnoseResponse {
        tool: TOOL_NAME,
        tool_version: TOOL_VERSION,
        assessment_count: assessments.len(),
        assessments,
        input_hash,
    })
}
