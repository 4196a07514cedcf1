//! The echo endpoint shared by the convert and converter services.

use axum::extract::State;
use axum::Json;

use crate::schema::echo::{EchoRequest, EchoResponse};
use crate::state::AppState;

/// Returns the submitted object unchanged with `"ok"` and the current Unix
/// time. Two identical requests may differ only in `created_at`.
///
/// `POST /ips`
pub async fn echo(
    State(state): State<AppState>,
    Json(req): Json<EchoRequest>,
) -> Json<EchoResponse> {
    tracing::debug!(service = %state.kind, keys = req.data.len(), "echo request");
    Json(EchoResponse::from(req))
}
