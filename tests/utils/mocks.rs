use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use room_relay::{
    room::BroadcastReport,
    websockets::{SocketError, SocketWrapper},
    ConnectionId, InMemoryRoomRegistry, RoomMember, RoomRegistry,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Socket driven by channels: the test writes client frames in and reads what
/// the server sends back out
pub struct MockSocket {
    inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
}

impl MockSocket {
    /// Returns the socket plus the client's ends: frame sender and inbox
    pub fn pair() -> (
        Self,
        mpsc::UnboundedSender<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (frame_sender, inbound) = mpsc::unbounded_channel();
        let (outbound, inbox) = mpsc::unbounded_channel();
        (Self { inbound, outbound }, frame_sender, inbox)
    }
}

#[async_trait]
impl SocketWrapper for MockSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.outbound
            .send(message)
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        Ok(self.inbound.recv().await)
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryCall {
    Join { member: ConnectionId, room: String },
    Leave { member: ConnectionId, room: String },
    Broadcast { sender: ConnectionId, room: String, message: String },
}

/// Registry that records every call before delegating to the in-memory one
#[derive(Clone)]
pub struct RecordingRegistry {
    inner: Arc<InMemoryRoomRegistry>,
    calls: Arc<RwLock<Vec<RegistryCall>>>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InMemoryRoomRegistry::new()),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn calls(&self) -> Vec<RegistryCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl RoomRegistry for RecordingRegistry {
    async fn join(&self, member: RoomMember, room_id: &str) {
        self.calls.write().await.push(RegistryCall::Join {
            member: member.id,
            room: room_id.to_string(),
        });
        self.inner.join(member, room_id).await;
    }

    async fn leave(&self, member_id: ConnectionId, room_id: &str) {
        self.calls.write().await.push(RegistryCall::Leave {
            member: member_id,
            room: room_id.to_string(),
        });
        self.inner.leave(member_id, room_id).await;
    }

    async fn broadcast(
        &self,
        sender_id: ConnectionId,
        room_id: &str,
        message: &str,
    ) -> BroadcastReport {
        self.calls.write().await.push(RegistryCall::Broadcast {
            sender: sender_id,
            room: room_id.to_string(),
            message: message.to_string(),
        });
        self.inner.broadcast(sender_id, room_id, message).await
    }

    async fn member_count(&self, room_id: &str) -> usize {
        self.inner.member_count(room_id).await
    }

    async fn room_count(&self) -> usize {
        self.inner.room_count().await
    }
}
