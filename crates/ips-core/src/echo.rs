//! The echo envelope: a caller payload returned with a status message and
//! the Unix time it was processed.

use serde::{Deserialize, Serialize};

use crate::clock::unix_now;

/// Fixed status message carried by every successful response.
pub const OK_MESSAGE: &str = "ok";

/// Untyped caller payload. Must be a JSON object; key order is irrelevant.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Body of a liveness probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        HealthStatus {
            message: OK_MESSAGE.to_string(),
        }
    }
}

/// Request body accepted by the echo endpoint.
///
/// Deserialization fails when `data` is missing or is not a JSON object,
/// which is the only validation the endpoint performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoRequest {
    pub data: Payload,
}

/// Response envelope: `{ message, data, created_at }`.
///
/// Generic over `T` so the room service can reuse the same envelope for
/// the room it creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoResponse<T = Payload> {
    pub message: String,
    pub data: T,
    /// Unix seconds (UTC) captured when the request was handled.
    pub created_at: i64,
}

impl<T> EchoResponse<T> {
    /// Wraps `data` with the `"ok"` message and an explicit timestamp.
    pub fn ok_at(data: T, created_at: i64) -> Self {
        EchoResponse {
            message: OK_MESSAGE.to_string(),
            data,
            created_at,
        }
    }

    /// Wraps `data` with the `"ok"` message, stamped with the current time.
    pub fn ok(data: T) -> Self {
        Self::ok_at(data, unix_now())
    }
}

impl From<EchoRequest> for EchoResponse {
    fn from(req: EchoRequest) -> Self {
        EchoResponse::ok(req.data)
    }
}
