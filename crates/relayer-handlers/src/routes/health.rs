use axum::Json;
use serde::Serialize;

/// Response of the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// RFC 3339 timestamp of the probe.
    pub timestamp: String,
    /// The service name.
    pub service: String,
}

/// Handles a liveness probe.
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: "pothole-relayer".to_string(),
    })
}
