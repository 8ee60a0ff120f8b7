use crate::realtime::ChangeFeed;
use crate::shared::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use log::debug;
use std::sync::Arc;

/// Raw change-feed stream: one JSON frame per collection change, no row
/// payload. Clients are expected to refetch through the HTTP API.
pub async fn handle_events_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let feed = state.change_feed.clone();
    ws.on_upgrade(move |socket| stream_events(socket, feed))
}

async fn stream_events(socket: WebSocket, feed: ChangeFeed) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscription = feed.subscribe();

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { break };
                let Ok(text) = serde_json::to_string(&event) else { continue };
                if sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Inbound frames carry nothing; the feed is one-way.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("Change-feed subscriber disconnected");
    // Subscription dropped here: the registration is released exactly once.
}
