//! Room records: a sharer plus the members that joined with a code.

use serde::{Deserialize, Serialize};

use crate::id::{RoomId, UserId};

/// A shareable session.
///
/// `members` keeps join order and never holds duplicates; the sharer is
/// always the first member at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: RoomId,
    pub sharer_uuid: UserId,
    pub members: Vec<UserId>,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds after which the room is no longer served.
    pub expires_at: i64,
}

impl Room {
    pub fn new(room_id: RoomId, sharer: UserId, created_at: i64, expires_at: i64) -> Self {
        Room {
            room_id,
            sharer_uuid: sharer,
            members: vec![sharer],
            created_at,
            expires_at,
        }
    }

    /// Adds `user` unless already present. Returns `true` if added.
    pub fn add_member(&mut self, user: UserId) -> bool {
        if self.is_member(&user) {
            return false;
        }
        self.members.push(user);
        true
    }

    /// Removes `user`. Returns `true` if the user was a member.
    pub fn remove_member(&mut self, user: &UserId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != user);
        self.members.len() != before
    }

    pub fn is_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }
}
