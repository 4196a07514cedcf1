//! Room registry with a sliding TTL.
//!
//! Every mutation that adds a member pushes the room's deadline out by the
//! configured TTL. Expired rooms are treated as absent on access and removed
//! lazily or by the background sweep.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use ips_core::{unix_after, unix_now, CoreError, Room, RoomId, UserId};

use super::ExpirySweep;
use crate::config::{DEFAULT_ROOM_TTL, MAX_TTL};

#[derive(Debug)]
struct RoomEntry {
    room: Room,
    deadline: Instant,
}

impl RoomEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Concurrent room registry backed by `DashMap`.
///
/// No map guard is ever held across an `.await`.
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomEntry>,
    ttl: Duration,
}

impl RoomRegistry {
    /// TTLs above [`MAX_TTL`] are clamped to it.
    pub fn new(ttl: Duration) -> Self {
        RoomRegistry {
            rooms: DashMap::new(),
            ttl: ttl.min(MAX_TTL),
        }
    }

    /// Registry with the 15-minute default TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_ROOM_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Creates a room under a fresh id with `sharer` as its only member.
    pub fn create(&self, sharer: UserId) -> Room {
        let room = Room::new(RoomId::new_v4(), sharer, unix_now(), unix_after(self.ttl));
        self.rooms.insert(
            room.room_id,
            RoomEntry {
                room: room.clone(),
                deadline: Instant::now() + self.ttl,
            },
        );
        tracing::debug!(room_id = %room.room_id, sharer = %sharer, "room created");
        room
    }

    /// Adds `user` to the room, creating the room under `room_id` when it
    /// does not exist or has expired. Refreshes the TTL either way.
    pub fn create_or_join(&self, room_id: RoomId, user: UserId) -> Room {
        let now = Instant::now();
        let deadline = now + self.ttl;
        let expires_at = unix_after(self.ttl);

        match self.rooms.entry(room_id) {
            Entry::Occupied(mut occupied) if !occupied.get().is_expired(now) => {
                let entry = occupied.get_mut();
                entry.room.add_member(user);
                entry.room.expires_at = expires_at;
                entry.deadline = deadline;
                entry.room.clone()
            }
            Entry::Occupied(mut occupied) => {
                let room = Room::new(room_id, user, unix_now(), expires_at);
                occupied.insert(RoomEntry {
                    room: room.clone(),
                    deadline,
                });
                room
            }
            Entry::Vacant(vacant) => {
                let room = Room::new(room_id, user, unix_now(), expires_at);
                vacant.insert(RoomEntry {
                    room: room.clone(),
                    deadline,
                });
                room
            }
        }
    }

    /// Returns the room if it exists and has not expired.
    pub fn get(&self, room_id: &RoomId) -> Result<Room, CoreError> {
        self.with_live(room_id, |entry| entry.room.clone())
    }

    /// Adds `user` to an existing room and refreshes its TTL.
    pub fn join(&self, room_id: &RoomId, user: UserId) -> Result<Room, CoreError> {
        let ttl = self.ttl;
        self.with_live(room_id, |entry| {
            entry.room.add_member(user);
            entry.room.expires_at = unix_after(ttl);
            entry.deadline = Instant::now() + ttl;
            entry.room.clone()
        })
    }

    /// Removes `user` from the room. The room stays until it expires.
    pub fn leave(&self, room_id: &RoomId, user: &UserId) -> Result<Room, CoreError> {
        self.with_live(room_id, |entry| {
            if entry.room.remove_member(user) {
                Ok(entry.room.clone())
            } else {
                Err(CoreError::MemberNotFound {
                    room: *room_id,
                    user: *user,
                })
            }
        })?
    }

    /// Number of stored rooms, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    fn with_live<T>(
        &self,
        room_id: &RoomId,
        f: impl FnOnce(&mut RoomEntry) -> T,
    ) -> Result<T, CoreError> {
        let now = Instant::now();
        self.rooms.remove_if(room_id, |_, entry| entry.is_expired(now));
        match self.rooms.get_mut(room_id) {
            Some(mut entry) => Ok(f(entry.value_mut())),
            None => Err(CoreError::RoomNotFound { id: *room_id }),
        }
    }
}

impl ExpirySweep for RoomRegistry {
    const LABEL: &'static str = "room(s)";

    fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.rooms.len();
        self.rooms.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.rooms.len())
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(n: u128) -> UserId {
        UserId(Uuid::from_u128(n))
    }

    #[test]
    fn create_then_get() {
        let registry = RoomRegistry::with_default_ttl();
        let room = registry.create(user(1));
        assert_eq!(room.sharer_uuid, user(1));
        assert_eq!(room.members, vec![user(1)]);
        assert_eq!(room.expires_at - room.created_at, 900);
        assert_eq!(registry.get(&room.room_id).unwrap(), room);
    }

    #[test]
    fn unknown_room_is_not_found() {
        let registry = RoomRegistry::with_default_ttl();
        let id = RoomId(Uuid::from_u128(77));
        assert!(matches!(registry.get(&id), Err(CoreError::RoomNotFound { id: got }) if got == id));
    }

    #[test]
    fn join_and_leave() {
        let registry = RoomRegistry::with_default_ttl();
        let room = registry.create(user(1));

        let joined = registry.join(&room.room_id, user(2)).unwrap();
        assert_eq!(joined.members, vec![user(1), user(2)]);

        let left = registry.leave(&room.room_id, &user(1)).unwrap();
        assert_eq!(left.members, vec![user(2)]);

        assert!(matches!(
            registry.leave(&room.room_id, &user(1)),
            Err(CoreError::MemberNotFound { .. })
        ));
    }

    #[test]
    fn create_or_join_reuses_live_room() {
        let registry = RoomRegistry::with_default_ttl();
        let id = RoomId(Uuid::from_u128(5));
        let first = registry.create_or_join(id, user(1));
        let second = registry.create_or_join(id, user(2));
        assert_eq!(first.room_id, second.room_id);
        assert_eq!(second.sharer_uuid, user(1));
        assert_eq!(second.members, vec![user(1), user(2)]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn zero_ttl_rooms_expire_immediately() {
        let registry = RoomRegistry::new(Duration::ZERO);
        let room = registry.create(user(1));
        assert_eq!(registry.len(), 1);
        assert!(matches!(registry.get(&room.room_id), Err(CoreError::RoomNotFound { .. })));
        // Lazy removal on access.
        assert!(registry.is_empty());
    }

    #[test]
    fn expired_room_is_recreated_by_create_or_join() {
        let registry = RoomRegistry::new(Duration::ZERO);
        let id = RoomId(Uuid::from_u128(5));
        registry.create_or_join(id, user(1));
        let fresh = registry.create_or_join(id, user(2));
        assert_eq!(fresh.sharer_uuid, user(2));
        assert_eq!(fresh.members, vec![user(2)]);
    }

    #[test]
    fn oversized_ttl_is_clamped() {
        let registry = RoomRegistry::new(Duration::MAX);
        assert_eq!(registry.ttl(), MAX_TTL);

        let room = registry.create(user(1));
        assert_eq!(room.expires_at - room.created_at, MAX_TTL.as_secs() as i64);
        let joined = registry.join(&room.room_id, user(2)).unwrap();
        assert!(joined.expires_at >= room.expires_at);
        registry.create_or_join(RoomId(Uuid::from_u128(8)), user(3));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn sweep_removes_only_expired() {
        let expired = RoomRegistry::new(Duration::ZERO);
        expired.create(user(1));
        expired.create(user(2));
        assert_eq!(expired.sweep_expired(), 2);
        assert!(expired.is_empty());

        let live = RoomRegistry::with_default_ttl();
        live.create(user(1));
        assert_eq!(live.sweep_expired(), 0);
        assert_eq!(live.len(), 1);
    }
}
