//! HTTP handler modules.
//!
//! Handlers are thin: they parse the request, delegate to the registries in
//! [`AppState`](crate::state::AppState) and return JSON. The echo handler is
//! shared by every echoing service kind.

pub mod echo;
pub mod health;
pub mod rooms;
pub mod signal;
