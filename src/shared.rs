use std::sync::Arc;
use thiserror::Error;

use crate::room::{InMemoryRoomRegistry, RoomRegistry};
use crate::websockets::RejoinPolicy;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn RoomRegistry>,
    pub rejoin_policy: RejoinPolicy,
}

impl AppState {
    pub fn new(registry: Arc<dyn RoomRegistry>, rejoin_policy: RejoinPolicy) -> Self {
        Self {
            registry,
            rejoin_policy,
        }
    }

    /// State backed by a fresh in-memory registry
    pub fn in_memory(rejoin_policy: RejoinPolicy) -> Self {
        Self::new(Arc::new(InMemoryRoomRegistry::new()), rejoin_policy)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}
