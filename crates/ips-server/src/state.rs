//! Shared application state.
//!
//! [`AppState`] is cloned into every handler. The echo services only read
//! `kind`; the room and join-code registries sit behind `Arc` and are used
//! by the share and signal services.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::{ServerConfig, ServiceKind};
use crate::rooms::{spawn_expiry_sweep, JoinCodeRegistry, RoomRegistry, JOIN_CODE_GRACE};

/// How often the registries purge expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    /// Which service this process serves.
    pub kind: ServiceKind,
    /// Rooms created through `POST /` or a signal `create` message.
    pub rooms: Arc<RoomRegistry>,
    /// Live join codes.
    pub join_codes: Arc<JoinCodeRegistry>,
}

impl AppState {
    /// Creates state with the TTLs from `config`.
    ///
    /// Does not start the expiry sweeps; see [`AppState::start_expiry_sweeps`].
    pub fn new(config: &ServerConfig) -> Self {
        AppState {
            kind: config.kind,
            rooms: Arc::new(RoomRegistry::new(config.room_ttl)),
            join_codes: Arc::new(JoinCodeRegistry::new(config.join_code_ttl, JOIN_CODE_GRACE)),
        }
    }

    /// Creates state with default TTLs for `kind` (for testing).
    pub fn for_kind(kind: ServiceKind) -> Self {
        Self::new(&ServerConfig::for_kind(kind))
    }

    /// Spawns the periodic expiry sweeps for both registries.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_expiry_sweeps(&self) -> Vec<JoinHandle<()>> {
        vec![
            spawn_expiry_sweep(&self.rooms, SWEEP_INTERVAL),
            spawn_expiry_sweep(&self.join_codes, SWEEP_INTERVAL),
        ]
    }
}
