use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::setup::{TestClient, SETTLE_TIMEOUT};

// ============================================================================
// Message Assertions
// ============================================================================

const QUIET_PERIOD: Duration = Duration::from_millis(100);

#[async_trait]
pub trait ClientAssertions {
    /// Wait for the next relayed envelope
    async fn expect_message(&mut self) -> Value;

    /// Assert nothing arrives within a short quiet period
    async fn expect_no_message(&mut self);
}

#[async_trait]
impl ClientAssertions for TestClient {
    async fn expect_message(&mut self) -> Value {
        let raw = tokio::time::timeout(SETTLE_TIMEOUT, self.inbox.recv())
            .await
            .unwrap_or_else(|_| panic!("{} received no message", self.name))
            .unwrap_or_else(|| panic!("{}'s connection closed", self.name));
        serde_json::from_str(&raw).expect("relayed frame is not JSON")
    }

    async fn expect_no_message(&mut self) {
        if let Ok(Some(raw)) = tokio::time::timeout(QUIET_PERIOD, self.inbox.recv()).await {
            panic!("{} unexpectedly received {}", self.name, raw);
        }
    }
}
