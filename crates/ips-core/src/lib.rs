//! Domain types shared by the IPS converter services.
//!
//! Holds the echo envelope, room records, join codes and the identifiers
//! used to address them. Nothing in this crate performs I/O.

pub mod clock;
pub mod echo;
pub mod error;
pub mod id;
pub mod join_code;
pub mod room;

// Re-export commonly used types
pub use clock::{unix_after, unix_now};
pub use echo::{EchoRequest, EchoResponse, HealthStatus, Payload, OK_MESSAGE};
pub use error::CoreError;
pub use id::{RoomId, UserId};
pub use join_code::{JoinCode, JOIN_CODE_LEN};
pub use room::Room;
