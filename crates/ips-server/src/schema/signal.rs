//! Messages exchanged over the signalling WebSocket.
//!
//! Frames are JSON text tagged by `type`, with camelCase field names.

use serde::{Deserialize, Serialize};

use ips_core::{JoinCode, RoomId, UserId};

/// Client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join (creating if needed) a room and start receiving join codes.
    #[serde(rename_all = "camelCase")]
    Create { room_id: RoomId, user_id: UserId },
    /// Leave a room.
    #[serde(rename_all = "camelCase")]
    Destroy { room_id: RoomId, user_id: UserId },
}

/// Server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Joined { room_id: RoomId, user_id: UserId },
    #[serde(rename_all = "camelCase")]
    JoinCode { join_code: JoinCode, ttl: u64 },
    #[serde(rename_all = "camelCase")]
    Destroyed { room_id: RoomId, user_id: UserId },
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}
