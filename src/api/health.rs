use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Service banner returned by `GET /`
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub mode: &'static str,
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self {
            status: "AI Service Online",
            mode: "Live Weather Enabled",
        }
    }
}

/// GET / - Service status
pub async fn service_status() -> Json<ServiceStatus> {
    Json(ServiceStatus::default())
}

/// GET /health/live - Liveness probe
///
/// Returns 200 if the application is running
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
