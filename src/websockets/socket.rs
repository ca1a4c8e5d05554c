use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::room::ConnectionId;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next text frame from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Per-connection callbacks driven by `Connection::run`
#[async_trait]
pub trait FrameHandler: Send {
    /// Handle one inbound text frame
    async fn on_frame(&mut self, frame: String);

    /// Called exactly once when the connection ends, for any reason
    async fn on_disconnect(&mut self);
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Send failed: {0}")]
    SendFailed(String),
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => return Ok(Some(text)),
                    Err(_) => debug!("Ignoring non UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue, // answered by axum
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
                None => return Ok(None), // Connection closed
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Connection represents a managed WebSocket connection
///
/// Inbound frames go to the frame handler; the outbound receiver carries
/// messages other connections broadcast to this one.
pub struct Connection {
    pub id: ConnectionId,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
    handler: Box<dyn FrameHandler>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
        handler: Box<dyn FrameHandler>,
    ) -> Self {
        Self {
            id,
            socket,
            outbound_receiver,
            handler,
        }
    }

    /// Run the connection until disconnect, then tear it down
    ///
    /// Returns the error that ended the connection, if any. Teardown runs either way.
    pub async fn run(mut self) -> Result<(), SocketError> {
        let result = self.pump().await;

        // Stop accepting broadcasts before leaving rooms
        self.outbound_receiver.close();
        let _ = self.socket.close().await;
        self.handler.on_disconnect().await;

        result
    }

    async fn pump(&mut self) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                // Handle outbound messages (from other room members to client)
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => self.socket.send_message(message).await?,
                        None => return Ok(()), // All senders dropped; a live RelaySession always holds one
                    }
                }

                // Handle inbound messages (from client to the relay)
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(frame)) => self.handler.on_frame(frame).await,
                        Ok(None) => return Ok(()), // Client disconnected
                        Err(e) => {
                            warn!(connection_id = %self.id, error = %e, "WebSocket receive error");
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}
