pub mod ws;

use crate::shared::state::AppState;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

pub fn configure_realtime_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/events", get(ws::handle_events_socket))
}

/// The only collection this feed reports on.
pub const TICKETS_TABLE: &str = "tickets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOp {
    Insert,
    Update,
    Delete,
}

/// A payload-free change notification. Subscribers refetch; they never
/// apply the event incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub op: RowOp,
}

/// Fan-out channel for ticket-collection changes. Every successful write
/// publishes exactly one event, delivered to all live subscriptions
/// including the writer's own.
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, op: RowOp) {
        // A send error only means no subscriber is currently listening.
        let _ = self.tx.send(ChangeEvent {
            table: TICKETS_TABLE.to_string(),
            op,
        });
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(128)
    }
}

/// A live interest registration on the ticket collection. Owned exclusively
/// by the view that opened it; dropping it is the release, so teardown is
/// deterministic on every exit path.
pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Wait for the next change event. A lagged receiver gets a single
    /// synthetic event: dropped notifications still mean the collection
    /// changed, and subscribers refetch wholesale anyway.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        match self.rx.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => Some(ChangeEvent {
                table: TICKETS_TABLE.to_string(),
                op: RowOp::Update,
            }),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    /// Payload-free variant of [`recv`](Self::recv) for callers that only
    /// care that something changed. Returns `false` when the feed is gone.
    pub async fn changed(&mut self) -> bool {
        self.recv().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let feed = ChangeFeed::new(8);
        let mut sub = feed.subscribe();
        feed.publish(RowOp::Insert);
        let event = sub.recv().await.expect("event");
        assert_eq!(event.table, TICKETS_TABLE);
        assert_eq!(event.op, RowOp::Insert);
    }

    #[tokio::test]
    async fn drop_releases_subscription() {
        let feed = ChangeFeed::new(8);
        let sub = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);
        drop(sub);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_write() {
        let feed = ChangeFeed::new(8);
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();
        feed.publish(RowOp::Update);
        assert!(a.changed().await);
        assert!(b.changed().await);
    }
}
