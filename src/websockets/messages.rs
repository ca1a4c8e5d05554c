use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message type that registers the sender in a room
pub const JOIN_TYPE: &str = "join";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Wire structure for every frame exchanged with clients
///
/// Only `type` and `room` are interpreted; everything else is carried in
/// `payload` and forwarded untouched. Control fields keep whatever JSON value
/// the client sent, including `null`, so forwarding never rewrites them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub message_type: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub room: Option<Value>,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
}

// A key that is present stays present, even when its value is null
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// What a decoded frame asks the relay to do
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Join { room: String },
    Relay { room: String, envelope: Envelope },
    Ignored,
}

impl Envelope {
    pub fn parse(frame: &str) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_str(frame)?)
    }

    pub fn to_json(&self) -> Result<String, EnvelopeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Non-empty string `room`; any other value counts as no room
    fn target_room(&self) -> Option<&str> {
        self.room
            .as_ref()
            .and_then(Value::as_str)
            .filter(|room| !room.is_empty())
    }

    fn is_join(&self) -> bool {
        self.message_type.as_ref().and_then(Value::as_str) == Some(JOIN_TYPE)
    }

    /// Classify the envelope into a relay action
    pub fn into_inbound(self) -> InboundMessage {
        let Some(room) = self.target_room().map(str::to_string) else {
            return InboundMessage::Ignored;
        };

        if self.is_join() {
            InboundMessage::Join { room }
        } else {
            InboundMessage::Relay {
                room,
                envelope: self,
            }
        }
    }
}

impl InboundMessage {
    /// Decode a text frame. Only frames that are not JSON objects fail.
    pub fn decode(frame: &str) -> Result<Self, EnvelopeError> {
        Envelope::parse(frame).map(Envelope::into_inbound)
    }
}
