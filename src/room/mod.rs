// Public API - what other modules can use
pub use member::{BroadcastReport, ConnectionId, RoomMember};
pub use registry::{InMemoryRoomRegistry, RoomRegistry};

// Internal modules
mod member;
mod registry;
