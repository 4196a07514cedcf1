//! API schema types for request/response definitions.
//!
//! The echo and health bodies live in `ips-core` and are re-exported from
//! [`echo`]; room and signalling messages are defined here.

pub mod echo;
pub mod rooms;
pub mod signal;
