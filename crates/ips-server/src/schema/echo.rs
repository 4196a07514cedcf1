//! Echo and liveness bodies, shared with `ips-core`.

pub use ips_core::echo::{EchoRequest, EchoResponse, HealthStatus, Payload};
