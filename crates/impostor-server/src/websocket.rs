//! WebSocket connection handling.

use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use impostor_core::Transport;
use impostor_types::{ErrorKind, WsClientMessage, WsServerMessage};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Maximum size for an inbound text frame (4KB)
const MAX_MESSAGE_SIZE: usize = 4 * 1024;

/// Drive one client connection until either side closes it.
///
/// Inbound frames are applied to the coordinator in arrival order. Outbound
/// messages arrive through the connection's hub queue.
pub async fn handle_websocket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut outgoing_rx = state.hub.register(connection_id);
    state.coordinator.connect(connection_id);
    info!(target: "impostor::ws", "Client {} connected", connection_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = outgoing_rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    warn!(target: "impostor::ws", "Failed to encode message for {}: {}", connection_id, e);
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::Text(json.into())).await {
                debug!(target: "impostor::ws", "WebSocket send failed for {}: {}", connection_id, e);
                break;
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                Message::Text(text) => match decode_frame(&text) {
                    Ok(client_msg) => {
                        // Rejections are already reported to the client.
                        let _ = recv_state.coordinator.handle(connection_id, client_msg).await;
                    }
                    Err(rejection) => {
                        debug!(target: "impostor::ws", "Rejected frame from {} ({} bytes)", connection_id, text.len());
                        recv_state.hub.unicast(connection_id, rejection);
                    }
                },
                Message::Close(_) => {
                    debug!(target: "impostor::ws", "Client {} closed connection", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    state.hub.unregister(connection_id);
    state.coordinator.disconnect(connection_id).await;

    info!(target: "impostor::ws", "Client {} disconnected", connection_id);
}

/// Parse one inbound text frame, or build the `error` to send back.
fn decode_frame(text: &str) -> Result<WsClientMessage, WsServerMessage> {
    if text.len() > MAX_MESSAGE_SIZE {
        warn!(target: "impostor::ws", "Rejecting oversized message ({} bytes)", text.len());
        return Err(WsServerMessage::Error {
            kind: ErrorKind::Validation,
            code: "message_too_large".to_string(),
            message: format!("Message exceeds {} bytes", MAX_MESSAGE_SIZE),
        });
    }

    serde_json::from_str::<WsClientMessage>(text).map_err(|e| WsServerMessage::Error {
        kind: ErrorKind::Validation,
        code: "malformed_message".to_string(),
        message: format!("Could not parse message: {}", e),
    })
}
