//! WebSocket upgrade for the signal service.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;

use crate::signal::run_socket;
use crate::state::AppState;

/// `GET /` (upgrade)
pub async fn signal(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    tracing::info!("signal client connected");
    ws.on_upgrade(move |socket| run_socket(socket, state))
}
