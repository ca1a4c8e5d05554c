// Public API
pub use handler::{handle_websocket_connection, websocket_handler};
pub use membership::{Membership, RejoinPolicy};
pub use messages::{Envelope, EnvelopeError, InboundMessage, JOIN_TYPE};
pub use session::RelaySession;
pub use socket::{Connection, FrameHandler, SocketError, SocketWrapper};

// Internal modules
mod handler;
mod membership;
mod messages;
mod session;
mod socket;
