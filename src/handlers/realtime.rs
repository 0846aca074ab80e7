//! Realtime WebSocket relay

use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, State},
    response::Response,
};
use tokio::sync::broadcast::{error::RecvError, Receiver};

use crate::broadcast::FaultNotification;
use crate::AppState;

/// Upgrade to a WebSocket that receives every `motor-update` event
pub async fn subscribe(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let events = state.broadcaster.subscribe();
    ws.on_upgrade(move |socket| relay(socket, events))
}

async fn relay(mut socket: WebSocket, mut events: Receiver<FaultNotification>) {
    tracing::debug!("Realtime client connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(notification) => {
                    let frame = match notification.to_frame() {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::error!("Failed to encode update #{}: {}", notification.id, e);
                            continue;
                        }
                    };
                    if socket.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Realtime client lagging, skipped {} update(s)", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Clients have nothing to say on this channel
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Realtime client disconnected");
}
