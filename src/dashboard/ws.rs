use crate::dashboard::session::DashboardSession;
use crate::dashboard::types::DashboardFrame;
use crate::shared::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use log::{debug, error};
use std::sync::Arc;
use uuid::Uuid;

pub async fn handle_dashboard_socket(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let user = state.identity.current_user(&headers);
    ws.on_upgrade(move |socket| run_dashboard(socket, state, user))
}

async fn push(sender: &mut SplitSink<WebSocket, Message>, frame: &DashboardFrame) -> bool {
    match serde_json::to_string(frame) {
        Ok(text) => sender.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            error!("Failed to encode dashboard frame: {}", e);
            true
        }
    }
}

async fn run_dashboard(socket: WebSocket, state: Arc<AppState>, user: Option<Uuid>) {
    let (mut sender, mut receiver) = socket.split();

    // An anonymous connection gets the placeholder, same as a user with no
    // role row.
    let Some(user_id) = user else {
        let _ = push(&mut sender, &DashboardFrame::NoRole).await;
        while let Some(frame) = receiver.next().await {
            if matches!(frame, Ok(Message::Close(_)) | Err(_)) {
                break;
            }
        }
        return;
    };

    let mut session = DashboardSession::open(
        user_id,
        state.directory.as_ref(),
        state.store.clone(),
        &state.change_feed,
    )
    .await;

    if session.role().is_none() {
        let _ = push(&mut sender, &DashboardFrame::NoRole).await;
        while let Some(frame) = receiver.next().await {
            if matches!(frame, Ok(Message::Close(_)) | Err(_)) {
                break;
            }
        }
        return;
    }

    debug!(
        "Dashboard session opened for {} as {:?}",
        user_id,
        session.role()
    );

    // Initial fetch. A failure keeps the (empty) list and pushes a one-line
    // notification; the session stays up.
    match session.refresh().await {
        Ok(()) => {
            if !push(&mut sender, &session.snapshot()).await {
                return;
            }
        }
        Err(e) => {
            let frame = DashboardFrame::Error {
                message: "Failed to load tickets".to_string(),
            };
            error!("Dashboard fetch failed for {}: {}", user_id, e);
            if !push(&mut sender, &frame).await {
                return;
            }
        }
    }

    loop {
        tokio::select! {
            changed = session.changed() => {
                if !changed {
                    break;
                }
                match session.refresh().await {
                    Ok(()) => {
                        if !push(&mut sender, &session.snapshot()).await {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Dashboard refetch failed for {}: {}", user_id, e);
                        let frame = DashboardFrame::Error {
                            message: "Failed to load tickets".to_string(),
                        };
                        if !push(&mut sender, &frame).await {
                            break;
                        }
                    }
                }
            }
            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // The dashboard stream is push-only; writes go over HTTP.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("Dashboard session closed for {}", user_id);
    // Session (and its subscription) dropped here, on every exit path.
}
