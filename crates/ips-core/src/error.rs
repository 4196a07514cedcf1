//! Core error types for ips-core.
//!
//! Uses `thiserror` for structured, matchable variants covering the room
//! and join-code failure modes.

use thiserror::Error;

use crate::id::{RoomId, UserId};

/// Errors produced by the ips-core crate and the registries built on it.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string that should hold a UUID did not parse.
    #[error("invalid uuid: '{value}'")]
    InvalidUuid { value: String },

    /// A join code that is not exactly six decimal digits.
    #[error("invalid join code: '{value}'")]
    InvalidJoinCode { value: String },

    /// The room does not exist or has expired.
    #[error("room not found: {id}")]
    RoomNotFound { id: RoomId },

    /// The user is not a member of the room.
    #[error("user {user} is not a member of room {room}")]
    MemberNotFound { room: RoomId, user: UserId },

    /// The join code is unknown or has expired.
    #[error("join code not found: {code}")]
    JoinCodeNotFound { code: String },

    /// Every candidate code drawn was already live.
    #[error("failed to generate unique join code after {attempts} attempts")]
    JoinCodeExhausted { attempts: usize },
}
