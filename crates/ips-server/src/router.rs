//! Router assembly.
//!
//! [`build_router`] mounts `/healthz` plus the routes of the configured
//! service kind, with CORS and tracing middleware layers.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceKind;
use crate::handlers;
use crate::state::AppState;

/// Builds the router for `state.kind` with no route prefix.
pub fn build_router(state: AppState) -> Router {
    build_router_with_prefix(state, None)
}

/// Builds the router, nesting every service route under `prefix`.
///
/// `/healthz` is never prefixed so probes keep a fixed path. `prefix` must
/// start with `/` and must not be `/` (see
/// [`normalize_prefix`](crate::config::normalize_prefix)).
///
/// CORS mirrors the caller's origin, methods and headers and allows
/// credentials, so browsers accept it where a literal `*` would be refused.
pub fn build_router_with_prefix(state: AppState, prefix: Option<&str>) -> Router {
    let routes = service_routes(state.kind);
    let routes = match prefix {
        Some(prefix) => Router::new().nest(prefix, routes),
        None => routes,
    };

    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .merge(routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn service_routes(kind: ServiceKind) -> Router<AppState> {
    match kind {
        ServiceKind::Convert | ServiceKind::Converter => {
            Router::new().route("/ips", post(handlers::echo::echo))
        }
        ServiceKind::Share => Router::new()
            .route("/", post(handlers::rooms::create_room))
            .route("/rooms/{room_id}", get(handlers::rooms::get_room))
            .route("/rooms/{room_id}/members", post(handlers::rooms::join_room))
            .route(
                "/rooms/{room_id}/members/{uuid}",
                delete(handlers::rooms::leave_room),
            )
            .route(
                "/rooms/{room_id}/join-code",
                post(handlers::rooms::issue_join_code),
            )
            .route("/join/{code}", get(handlers::rooms::resolve_join_code)),
        ServiceKind::Signal => Router::new()
            .route("/", get(handlers::signal::signal))
            .route("/join/{code}", get(handlers::rooms::resolve_join_code)),
    }
}
