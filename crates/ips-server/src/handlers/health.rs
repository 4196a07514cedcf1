//! Liveness probe.

use axum::Json;

use crate::schema::echo::HealthStatus;

/// `GET /healthz`
pub async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
