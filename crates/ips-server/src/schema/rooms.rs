//! Schema types for the room API of the share service.

use serde::{Deserialize, Serialize};

use ips_core::{EchoResponse, Room, UserId};

use crate::error::ApiError;

/// Body of `POST /`: the sharer creating a room.
///
/// `uuid` is taken as a string so a malformed id is answered with the
/// structured `BAD_REQUEST` body rather than an extractor rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub uuid: String,
}

/// Body of `POST /rooms/{room_id}/members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub uuid: String,
}

/// Response of `POST /`: the room wrapped in the echo envelope.
pub type CreateRoomResponse = EchoResponse<Room>;

/// Parses a client-supplied user id.
pub fn parse_user(raw: &str) -> Result<UserId, ApiError> {
    Ok(raw.parse::<UserId>()?)
}
