//! HTTP/JSON services behind the IPS converter client.
//!
//! One library serves every service kind: the echo services (convert,
//! converter), room sharing (share) and WebSocket signalling (signal). This
//! crate contains configuration, the router, handlers, API schema types,
//! the in-memory room registries and error handling.

pub mod config;
pub mod error;
pub mod handlers;
pub mod rooms;
pub mod router;
pub mod schema;
pub mod server;
pub mod signal;
pub mod state;

pub use server::{init_tracing, serve};
