//! Join-code registry.
//!
//! A code is advertised with a short TTL but kept resolvable for an extra
//! grace period, so a code read off a screen just before rotation still
//! works. Codes are unique among live entries.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use ips_core::{CoreError, JoinCode, RoomId};

use super::ExpirySweep;
use crate::config::{DEFAULT_JOIN_CODE_TTL, MAX_TTL};

/// How many candidate codes are drawn before giving up.
pub const MAX_JOIN_CODE_ATTEMPTS: usize = 10;

/// Extra time a code stays resolvable after its advertised TTL.
pub const JOIN_CODE_GRACE: Duration = Duration::from_secs(5);

/// A freshly issued join code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedJoinCode {
    pub join_code: JoinCode,
    pub room_id: RoomId,
    /// Advertised lifetime in seconds.
    pub ttl: u64,
}

#[derive(Debug)]
struct CodeEntry {
    room_id: RoomId,
    deadline: Instant,
}

impl CodeEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

pub struct JoinCodeRegistry {
    codes: DashMap<JoinCode, CodeEntry>,
    ttl: Duration,
    grace: Duration,
}

impl JoinCodeRegistry {
    /// Both durations are clamped to [`MAX_TTL`].
    pub fn new(ttl: Duration, grace: Duration) -> Self {
        JoinCodeRegistry {
            codes: DashMap::new(),
            ttl: ttl.min(MAX_TTL),
            grace: grace.min(MAX_TTL),
        }
    }

    /// Registry with a 5-second TTL and 5-second grace.
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_JOIN_CODE_TTL, JOIN_CODE_GRACE)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a random code for `room_id`.
    pub fn issue(&self, room_id: RoomId) -> Result<IssuedJoinCode, CoreError> {
        self.issue_with(room_id, || JoinCode::generate(&mut rand::thread_rng()))
    }

    /// Issues a code drawn from `generate`, retrying on collisions with live
    /// codes up to [`MAX_JOIN_CODE_ATTEMPTS`] times.
    pub fn issue_with<F>(&self, room_id: RoomId, mut generate: F) -> Result<IssuedJoinCode, CoreError>
    where
        F: FnMut() -> JoinCode,
    {
        for _ in 0..MAX_JOIN_CODE_ATTEMPTS {
            let code = generate();
            let now = Instant::now();
            self.codes.remove_if(&code, |_, entry| entry.is_expired(now));

            if let Entry::Vacant(slot) = self.codes.entry(code.clone()) {
                slot.insert(CodeEntry {
                    room_id,
                    deadline: now + self.ttl + self.grace,
                });
                tracing::debug!(room_id = %room_id, join_code = %code, "join code issued");
                return Ok(IssuedJoinCode {
                    join_code: code,
                    room_id,
                    ttl: self.ttl.as_secs(),
                });
            }
        }

        tracing::warn!(room_id = %room_id, "join code space exhausted");
        Err(CoreError::JoinCodeExhausted {
            attempts: MAX_JOIN_CODE_ATTEMPTS,
        })
    }

    /// Looks up the room a live code points at.
    pub fn resolve(&self, code: &JoinCode) -> Result<RoomId, CoreError> {
        let now = Instant::now();
        self.codes.remove_if(code, |_, entry| entry.is_expired(now));
        self.codes
            .get(code)
            .map(|entry| entry.room_id)
            .ok_or_else(|| CoreError::JoinCodeNotFound {
                code: code.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl ExpirySweep for JoinCodeRegistry {
    const LABEL: &'static str = "join code(s)";

    fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.codes.len();
        self.codes.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.codes.len())
    }
}

impl Default for JoinCodeRegistry {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn room(n: u128) -> RoomId {
        RoomId(Uuid::from_u128(n))
    }

    fn code(s: &str) -> JoinCode {
        s.parse().unwrap()
    }

    #[test]
    fn issued_code_resolves_to_room() {
        let registry = JoinCodeRegistry::with_default_ttl();
        let issued = registry.issue(room(1)).unwrap();
        assert_eq!(issued.ttl, 5);
        assert_eq!(issued.room_id, room(1));
        assert_eq!(registry.resolve(&issued.join_code).unwrap(), room(1));
    }

    #[test]
    fn collisions_are_retried() {
        let registry = JoinCodeRegistry::with_default_ttl();
        registry.issue_with(room(1), || code("111111")).unwrap();

        let mut draws = vec![code("222222"), code("111111"), code("111111")];
        let issued = registry
            .issue_with(room(2), || draws.pop().unwrap())
            .unwrap();
        assert_eq!(issued.join_code, code("222222"));
        assert_eq!(registry.resolve(&code("111111")).unwrap(), room(1));
        assert_eq!(registry.resolve(&code("222222")).unwrap(), room(2));
    }

    #[test]
    fn exhaustion_after_max_attempts() {
        let registry = JoinCodeRegistry::with_default_ttl();
        registry.issue_with(room(1), || code("123456")).unwrap();

        let mut calls = 0;
        let err = registry
            .issue_with(room(2), || {
                calls += 1;
                code("123456")
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::JoinCodeExhausted { attempts: MAX_JOIN_CODE_ATTEMPTS }));
        assert_eq!(calls, MAX_JOIN_CODE_ATTEMPTS);
    }

    #[test]
    fn expired_codes_do_not_resolve_and_can_be_reissued() {
        let registry = JoinCodeRegistry::new(Duration::ZERO, Duration::ZERO);
        registry.issue_with(room(1), || code("654321")).unwrap();
        assert!(matches!(
            registry.resolve(&code("654321")),
            Err(CoreError::JoinCodeNotFound { .. })
        ));

        registry.issue_with(room(1), || code("654321")).unwrap();
        let reissued = registry.issue_with(room(2), || code("654321")).unwrap();
        assert_eq!(reissued.room_id, room(2));
    }

    #[test]
    fn oversized_ttl_is_clamped() {
        let registry = JoinCodeRegistry::new(Duration::MAX, Duration::MAX);
        assert_eq!(registry.ttl(), MAX_TTL);
        let issued = registry.issue(room(1)).unwrap();
        assert_eq!(issued.ttl, MAX_TTL.as_secs());
        assert_eq!(registry.resolve(&issued.join_code).unwrap(), room(1));
    }

    #[test]
    fn sweep_purges_expired_codes() {
        let registry = JoinCodeRegistry::new(Duration::ZERO, Duration::ZERO);
        registry.issue_with(room(1), || code("000001")).unwrap();
        registry.issue_with(room(1), || code("000002")).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.sweep_expired(), 2);
        assert!(registry.is_empty());
    }
}
