//! In-memory room and join-code registries.
//!
//! Provides the state behind the share and signal services:
//! - [`registry::RoomRegistry`] for rooms with a sliding TTL
//! - [`join_codes::JoinCodeRegistry`] for short-lived numeric join codes
//!
//! Nothing here is persisted; a restart forgets every room.

pub mod join_codes;
pub mod registry;

pub use join_codes::{IssuedJoinCode, JoinCodeRegistry, JOIN_CODE_GRACE, MAX_JOIN_CODE_ATTEMPTS};
pub use registry::RoomRegistry;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A registry whose entries expire and can be purged in bulk.
pub trait ExpirySweep: Send + Sync + 'static {
    /// Name used in log lines.
    const LABEL: &'static str;

    /// Removes every expired entry, returning how many were removed.
    fn sweep_expired(&self) -> usize;
}

/// Spawns a task purging expired entries from `registry` every `interval`.
///
/// The task runs until the returned handle is aborted or the runtime stops.
pub fn spawn_expiry_sweep<R: ExpirySweep>(registry: &Arc<R>, interval: Duration) -> JoinHandle<()> {
    let registry = Arc::clone(registry);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        loop {
            tick.tick().await;
            let removed = registry.sweep_expired();
            if removed > 0 {
                tracing::info!("Swept {} expired {}", removed, R::LABEL);
            }
        }
    })
}
