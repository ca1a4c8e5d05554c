use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::member::{BroadcastReport, ConnectionId, RoomMember};

/// Process-wide room membership
///
/// Rooms are created by the first join and removed by the last leave; a room
/// with no members is never observable.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Adds the member to the room, creating the room if needed. Joining twice is a no-op.
    async fn join(&self, member: RoomMember, room_id: &str);

    /// Removes the member from the room. Unknown rooms and members are ignored.
    async fn leave(&self, member_id: ConnectionId, room_id: &str);

    /// Delivers the message to every open member of the room except the sender
    async fn broadcast(&self, sender_id: ConnectionId, room_id: &str, message: &str)
        -> BroadcastReport;

    async fn member_count(&self, room_id: &str) -> usize;

    async fn room_count(&self) -> usize;
}

/// In-memory registry guarded by a single lock
pub struct InMemoryRoomRegistry {
    // room_id -> (connection id -> member)
    rooms: RwLock<HashMap<String, HashMap<ConnectionId, RoomMember>>>,
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    #[instrument(skip(self, member), fields(connection_id = %member.id))]
    async fn join(&self, member: RoomMember, room_id: &str) {
        let mut rooms = self.rooms.write().await;
        let members = rooms.entry(room_id.to_string()).or_default();
        let member_id = member.id;
        members.entry(member_id).or_insert(member);

        info!(
            room_id = %room_id,
            member_count = members.len(),
            "Connection joined room"
        );
    }

    #[instrument(skip(self))]
    async fn leave(&self, member_id: ConnectionId, room_id: &str) {
        let mut rooms = self.rooms.write().await;

        let Some(members) = rooms.get_mut(room_id) else {
            debug!(room_id = %room_id, "Room not found on leave");
            return;
        };

        if members.remove(&member_id).is_none() {
            debug!(room_id = %room_id, "Connection was not a member of room");
            return;
        }

        if members.is_empty() {
            rooms.remove(room_id);
            info!(room_id = %room_id, "Last member left, room removed");
        } else {
            info!(
                room_id = %room_id,
                member_count = members.len(),
                "Connection left room"
            );
        }
    }

    #[instrument(skip(self, message))]
    async fn broadcast(
        &self,
        sender_id: ConnectionId,
        room_id: &str,
        message: &str,
    ) -> BroadcastReport {
        // Snapshot recipients, then send without holding the lock
        let recipients: Vec<RoomMember> = {
            let rooms = self.rooms.read().await;
            match rooms.get(room_id) {
                Some(members) => members
                    .values()
                    .filter(|member| member.id != sender_id)
                    .cloned()
                    .collect(),
                None => {
                    debug!(room_id = %room_id, "Broadcast to unknown room ignored");
                    return BroadcastReport::default();
                }
            }
        };

        let mut report = BroadcastReport::default();
        for recipient in recipients {
            if !recipient.is_open() {
                report.skipped += 1;
                continue;
            }
            match recipient.deliver(message.to_string()) {
                Ok(()) => report.delivered += 1,
                Err(_) => {
                    debug!(
                        room_id = %room_id,
                        recipient = %recipient.id,
                        "Recipient closed during broadcast, skipping"
                    );
                    report.skipped += 1;
                }
            }
        }

        debug!(
            room_id = %room_id,
            delivered = report.delivered,
            skipped = report.skipped,
            "Broadcast complete"
        );
        report
    }

    async fn member_count(&self, room_id: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room_id)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}
