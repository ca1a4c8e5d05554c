// Library crate for the room relay server
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use app::create_router;
pub use config::RelayConfig;
pub use room::{ConnectionId, InMemoryRoomRegistry, RoomMember, RoomRegistry};
pub use shared::{AppError, AppState};
pub use websockets::{Connection, Envelope, RejoinPolicy, RelaySession, SocketWrapper};
