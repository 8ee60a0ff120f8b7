use deskserver::realtime::{ChangeFeed, RowOp};
use deskserver::shared::test_utils::MemoryTicketStore;
use deskserver::tickets::store::TicketStore;
use deskserver::tickets::types::{NewTicket, TicketPriority, TicketStatus};
use std::sync::Arc;
use uuid::Uuid;

fn store() -> (ChangeFeed, Arc<MemoryTicketStore>) {
    let feed = ChangeFeed::new(16);
    let store = Arc::new(MemoryTicketStore::new(feed.clone()));
    (feed, store)
}

fn printer_jam(customer_id: Uuid) -> NewTicket {
    NewTicket {
        title: "Printer jam".to_string(),
        description: "Paper stuck in tray 2".to_string(),
        priority: TicketPriority::High,
        customer_id,
    }
}

#[tokio::test]
async fn created_tickets_start_open_and_unassigned() {
    let (_feed, store) = store();
    let customer = Uuid::new_v4();

    let ticket = store.create(printer_jam(customer)).await.expect("create");

    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.agent_id, None);
    assert_eq!(ticket.customer_id, customer);
    assert_eq!(ticket.priority, TicketPriority::High);
}

#[tokio::test]
async fn status_change_stamps_the_acting_agent() {
    let (_feed, store) = store();
    let customer = Uuid::new_v4();
    let agent_a = Uuid::new_v4();
    let agent_b = Uuid::new_v4();

    let ticket = store.create(printer_jam(customer)).await.expect("create");

    // Own list shows the new ticket first, still open.
    let own = store.list_own(customer).await.expect("list own");
    assert_eq!(own.first().map(|t| t.id), Some(ticket.id));
    assert_eq!(own[0].status, TicketStatus::Open);

    let resolved = store
        .update_status(ticket.id, TicketStatus::Resolved, agent_a)
        .await
        .expect("resolve");
    assert_eq!(resolved.status, TicketStatus::Resolved);
    assert_eq!(resolved.agent_id, Some(agent_a));

    // A second agent closing right after silently wins; no conflict error.
    let closed = store
        .update_status(ticket.id, TicketStatus::Closed, agent_b)
        .await
        .expect("close");
    assert_eq!(closed.status, TicketStatus::Closed);
    assert_eq!(closed.agent_id, Some(agent_b));

    let all = store.list_all().await.expect("list all");
    let stored = all.iter().find(|t| t.id == ticket.id).expect("stored");
    assert_eq!(stored.status, TicketStatus::Closed);
    assert_eq!(stored.agent_id, Some(agent_b));
}

#[tokio::test]
async fn status_change_is_idempotent() {
    let (_feed, store) = store();
    let agent = Uuid::new_v4();
    let ticket = store
        .create(printer_jam(Uuid::new_v4()))
        .await
        .expect("create");

    let once = store
        .update_status(ticket.id, TicketStatus::InProgress, agent)
        .await
        .expect("first update");
    let twice = store
        .update_status(ticket.id, TicketStatus::InProgress, agent)
        .await
        .expect("second update");

    assert_eq!(once.status, twice.status);
    assert_eq!(once.agent_id, twice.agent_id);
}

#[tokio::test]
async fn updating_a_missing_ticket_is_not_found() {
    let (_feed, store) = store();
    let result = store
        .update_status(Uuid::new_v4(), TicketStatus::Resolved, Uuid::new_v4())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn customer_list_is_a_subset_of_the_agent_list() {
    let (_feed, store) = store();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    for customer in [alice, alice, bob] {
        store.create(printer_jam(customer)).await.expect("create");
    }

    let all = store.list_all().await.expect("list all");
    let own = store.list_own(alice).await.expect("list own");

    assert_eq!(all.len(), 3);
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|t| t.customer_id == alice));
    // Every ticket in the customer view appears in the agent view.
    assert!(own
        .iter()
        .all(|mine| all.iter().any(|t| t.id == mine.id)));
    // And the agent view restricted to alice is exactly the customer view.
    let restricted: Vec<_> = all.iter().filter(|t| t.customer_id == alice).collect();
    assert_eq!(restricted.len(), own.len());
}

#[tokio::test]
async fn lists_are_newest_first() {
    let (_feed, store) = store();
    let customer = Uuid::new_v4();

    let first = store.create(printer_jam(customer)).await.expect("create");
    let second = store
        .create(NewTicket {
            title: "Monitor flickers".to_string(),
            description: "Intermittent on DVI".to_string(),
            priority: TicketPriority::Low,
            customer_id: customer,
        })
        .await
        .expect("create");

    let all = store.list_all().await.expect("list all");
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
}

#[tokio::test]
async fn blank_fields_are_rejected_before_insert() {
    let (_feed, store) = store();
    let result = store
        .create(NewTicket {
            title: String::new(),
            description: "details".to_string(),
            priority: TicketPriority::Medium,
            customer_id: Uuid::new_v4(),
        })
        .await;
    assert!(result.is_err());
    assert!(store.list_all().await.expect("list").is_empty());
}

#[tokio::test]
async fn every_write_fires_the_change_feed() {
    let (feed, store) = store();
    let mut subscription = feed.subscribe();

    let ticket = store
        .create(printer_jam(Uuid::new_v4()))
        .await
        .expect("create");
    let event = subscription.recv().await.expect("insert event");
    assert_eq!(event.op, RowOp::Insert);

    store
        .update_status(ticket.id, TicketStatus::InProgress, Uuid::new_v4())
        .await
        .expect("update");
    let event = subscription.recv().await.expect("update event");
    assert_eq!(event.op, RowOp::Update);
}
