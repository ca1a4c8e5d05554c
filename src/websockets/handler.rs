use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::room::{ConnectionId, RoomMember};
use crate::shared::AppState;

use super::session::RelaySession;
use super::socket::{Connection, SocketWrapper};

/// WebSocket upgrade handler
///
/// GET / with an upgrade request. Room membership is declared afterwards
/// through `join` frames, so the handshake itself carries no parameters.
#[instrument(name = "websocket_handler", skip(state, ws))]
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    info!("WebSocket connection requested");
    ws.on_upgrade(move |socket| handle_websocket_connection(Box::new(socket), state))
}

/// Drive one upgraded connection from accept to teardown
pub async fn handle_websocket_connection(socket: Box<dyn SocketWrapper>, state: AppState) {
    let connection_id = ConnectionId::new();
    info!(connection_id = %connection_id, "New client connected");

    // Outbound channel (room peers -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    let member = RoomMember::new(connection_id, outbound_sender);
    let session = RelaySession::new(member, state.registry.clone(), state.rejoin_policy);
    let connection = Connection::new(connection_id, socket, outbound_receiver, Box::new(session));

    match connection.run().await {
        Ok(()) => info!(connection_id = %connection_id, "Client disconnected"),
        Err(e) => warn!(
            connection_id = %connection_id,
            error = %e,
            "Client disconnected after WebSocket error"
        ),
    }
}
