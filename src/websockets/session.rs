use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::room::{RoomMember, RoomRegistry};

use super::membership::{Membership, RejoinPolicy};
use super::messages::{Envelope, InboundMessage};
use super::socket::FrameHandler;

/// Relay behaviour for one connection: joins, broadcasts and teardown
pub struct RelaySession {
    member: RoomMember,
    membership: Membership,
    registry: Arc<dyn RoomRegistry>,
    rejoin_policy: RejoinPolicy,
}

impl RelaySession {
    pub fn new(
        member: RoomMember,
        registry: Arc<dyn RoomRegistry>,
        rejoin_policy: RejoinPolicy,
    ) -> Self {
        Self {
            member,
            membership: Membership::Unjoined,
            registry,
            rejoin_policy,
        }
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    async fn join(&mut self, room: String) {
        if let Some(previous) = self.membership.join(&room, self.rejoin_policy) {
            debug!(
                connection_id = %self.member.id,
                previous_room = %previous,
                room_id = %room,
                "Migrating to new room"
            );
            self.registry.leave(self.member.id, &previous).await;
        }
        self.registry.join(self.member.clone(), &room).await;
    }

    async fn relay(&self, room: &str, envelope: &Envelope) {
        let message = match envelope.to_json() {
            Ok(message) => message,
            Err(e) => {
                warn!(connection_id = %self.member.id, error = %e, "Failed to serialize envelope");
                return;
            }
        };

        let report = self.registry.broadcast(self.member.id, room, &message).await;
        debug!(
            connection_id = %self.member.id,
            room_id = %room,
            delivered = report.delivered,
            skipped = report.skipped,
            "Relayed message"
        );
    }
}

#[async_trait]
impl FrameHandler for RelaySession {
    async fn on_frame(&mut self, frame: String) {
        match InboundMessage::decode(&frame) {
            Ok(InboundMessage::Join { room }) => self.join(room).await,
            Ok(InboundMessage::Relay { room, envelope }) => self.relay(&room, &envelope).await,
            Ok(InboundMessage::Ignored) => {
                debug!(connection_id = %self.member.id, "Frame has no target room, ignoring");
            }
            Err(e) => {
                warn!(
                    connection_id = %self.member.id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
            }
        }
    }

    async fn on_disconnect(&mut self) {
        let rooms = self.membership.disconnect();
        for room in &rooms {
            self.registry.leave(self.member.id, room).await;
        }

        info!(
            connection_id = %self.member.id,
            rooms_left = rooms.len(),
            "Connection torn down"
        );
    }
}
