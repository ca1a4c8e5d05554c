use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Stable identity of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Send-capable handle for a connection, as held by the registry
///
/// The outbound sender feeds the connection's own write loop. Once that loop
/// ends and drops its receiver, the member is considered closed.
#[derive(Debug, Clone)]
pub struct RoomMember {
    pub id: ConnectionId,
    outbound: mpsc::UnboundedSender<String>,
}

impl RoomMember {
    pub fn new(id: ConnectionId, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { id, outbound }
    }

    /// Whether the connection can still accept messages
    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Queue a message for this member. Fails only if the connection is gone.
    pub fn deliver(&self, message: String) -> Result<(), mpsc::error::SendError<String>> {
        self.outbound.send(message)
    }
}

/// Outcome of a single fan-out, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub skipped: usize,
}
