use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use room_relay::{websockets::handle_websocket_connection, AppState, RejoinPolicy, RoomRegistry};

use super::mocks::MockSocket;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct TestSetup {
    pub registry: Arc<dyn RoomRegistry>,
    pub state: AppState,
}

pub struct TestSetupBuilder {
    registry: Option<Arc<dyn RoomRegistry>>,
    rejoin_policy: RejoinPolicy,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            rejoin_policy: RejoinPolicy::Retain,
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn RoomRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_rejoin_policy(mut self, policy: RejoinPolicy) -> Self {
        self.rejoin_policy = policy;
        self
    }

    pub fn build(self) -> TestSetup {
        let state = match self.registry {
            Some(registry) => AppState::new(registry, self.rejoin_policy),
            None => AppState::in_memory(self.rejoin_policy),
        };
        TestSetup {
            registry: state.registry.clone(),
            state,
        }
    }
}

impl TestSetup {
    /// Open a connection through the same path an upgraded WebSocket takes
    pub fn connect(&self, name: &str) -> TestClient {
        let (socket, frames, inbox) = MockSocket::pair();
        let handle = tokio::spawn(handle_websocket_connection(
            Box::new(socket),
            self.state.clone(),
        ));
        TestClient {
            name: name.to_string(),
            frames: Some(frames),
            inbox,
            handle: Some(handle),
        }
    }

    /// Wait until the registry reports the expected member count for a room
    pub async fn wait_for_members(&self, room: &str, expected: usize) {
        let registry = self.registry.clone();
        let result = tokio::time::timeout(SETTLE_TIMEOUT, async {
            while registry.member_count(room).await != expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;

        assert!(
            result.is_ok(),
            "room {} never reached {} members (has {})",
            room,
            expected,
            self.registry.member_count(room).await
        );
    }
}

pub struct TestClient {
    pub name: String,
    frames: Option<mpsc::UnboundedSender<String>>,
    pub inbox: mpsc::UnboundedReceiver<String>,
    handle: Option<JoinHandle<()>>,
}

impl TestClient {
    pub fn send_raw(&self, frame: &str) {
        self.frames
            .as_ref()
            .expect("client already disconnected")
            .send(frame.to_string())
            .expect("connection task ended");
    }

    pub fn send(&self, envelope: Value) {
        self.send_raw(&envelope.to_string());
    }

    pub fn join(&self, room: &str) {
        self.send(json!({"type": "join", "room": room}));
    }

    pub fn say(&self, room: &str, text: &str) -> Value {
        let envelope = json!({"type": "msg", "room": room, "text": text, "from": self.name});
        self.send(envelope.clone());
        envelope
    }

    /// Close the client side and wait for the server-side teardown to finish
    pub async fn disconnect(&mut self) {
        self.frames.take();
        if let Some(handle) = self.handle.take() {
            tokio::time::timeout(SETTLE_TIMEOUT, handle)
                .await
                .expect("teardown timed out")
                .expect("connection task panicked");
        }
    }
}
