//! Identifier newtypes for rooms and their members.
//!
//! Both wrap a `Uuid` so a `RoomId` cannot be passed where a `UserId` is
//! expected. Both serialize transparently as the hyphenated UUID string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Room identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

/// Identifier of a sharer or room member, supplied by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl RoomId {
    /// Generates a fresh random (v4) room id.
    pub fn new_v4() -> Self {
        RoomId(Uuid::new_v4())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(RoomId)
    }
}

impl FromStr for UserId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(UserId)
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(s.trim()).map_err(|_| CoreError::InvalidUuid {
        value: s.to_string(),
    })
}
