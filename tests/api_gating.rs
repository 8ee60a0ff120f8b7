//! Role gating at the handler layer: who may create, who may list, who may
//! change status, and what an anonymous caller gets.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use deskserver::directory::types::UserRole;
use deskserver::shared::test_utils::{test_state, MemoryRoleDirectory, StaticIdentity};
use deskserver::tickets::error::TicketsError;
use deskserver::tickets::handlers;
use deskserver::tickets::types::{
    ChangeStatusRequest, CreateTicketRequest, TicketPriority, TicketStatus,
};
use uuid::Uuid;

fn printer_jam_request() -> CreateTicketRequest {
    CreateTicketRequest {
        title: "Printer jam".to_string(),
        description: "Paper stuck in tray 2".to_string(),
        priority: TicketPriority::High,
    }
}

#[tokio::test]
async fn anonymous_writes_abort_with_no_detail() {
    let state = test_state(MemoryRoleDirectory::new(), StaticIdentity::anonymous());

    let result = handlers::create_ticket(
        State(state),
        HeaderMap::new(),
        Json(printer_jam_request()),
    )
    .await;

    assert!(matches!(result, Err(TicketsError::Unauthenticated)));
}

#[tokio::test]
async fn customers_create_and_list_their_own() {
    let customer = Uuid::new_v4();
    let directory = MemoryRoleDirectory::new().with_role(customer, UserRole::Customer);
    let state = test_state(directory, StaticIdentity::signed_in(customer));

    let Json(ticket) = handlers::create_ticket(
        State(state.clone()),
        HeaderMap::new(),
        Json(printer_jam_request()),
    )
    .await
    .expect("create");

    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.agent_id, None);
    assert_eq!(ticket.customer_id, customer);

    let Json(own) = handlers::list_own_tickets(State(state.clone()), HeaderMap::new())
        .await
        .expect("list own");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, ticket.id);

    // The full list is agent territory.
    let result = handlers::list_tickets(State(state), HeaderMap::new()).await;
    assert!(matches!(result, Err(TicketsError::Forbidden(_))));
}

#[tokio::test]
async fn agents_change_status_but_never_create() {
    let customer = Uuid::new_v4();
    let agent = Uuid::new_v4();

    let customer_state = test_state(
        MemoryRoleDirectory::new().with_role(customer, UserRole::Customer),
        StaticIdentity::signed_in(customer),
    );
    let Json(ticket) = handlers::create_ticket(
        State(customer_state.clone()),
        HeaderMap::new(),
        Json(printer_jam_request()),
    )
    .await
    .expect("create");

    // Same store, seen through an agent's session.
    let agent_state = std::sync::Arc::new(deskserver::shared::state::AppState {
        directory: std::sync::Arc::new(
            MemoryRoleDirectory::new().with_role(agent, UserRole::Agent),
        ),
        identity: std::sync::Arc::new(StaticIdentity::signed_in(agent)),
        ..(*customer_state).clone()
    });

    let result = handlers::create_ticket(
        State(agent_state.clone()),
        HeaderMap::new(),
        Json(printer_jam_request()),
    )
    .await;
    assert!(matches!(result, Err(TicketsError::Forbidden(_))));

    let Json(updated) = handlers::change_status(
        State(agent_state.clone()),
        Path(ticket.id),
        HeaderMap::new(),
        Json(ChangeStatusRequest {
            status: TicketStatus::Resolved,
        }),
    )
    .await
    .expect("change status");
    assert_eq!(updated.status, TicketStatus::Resolved);
    assert_eq!(updated.agent_id, Some(agent));

    let Json(stats) = handlers::get_ticket_stats(State(agent_state), HeaderMap::new())
        .await
        .expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.resolved, 1);

    // Customers cannot move tickets through the lifecycle.
    let result = handlers::change_status(
        State(customer_state),
        Path(ticket.id),
        HeaderMap::new(),
        Json(ChangeStatusRequest {
            status: TicketStatus::Closed,
        }),
    )
    .await;
    assert!(matches!(result, Err(TicketsError::Forbidden(_))));
}

#[tokio::test]
async fn blank_title_is_a_validation_error() {
    let customer = Uuid::new_v4();
    let state = test_state(
        MemoryRoleDirectory::new().with_role(customer, UserRole::Customer),
        StaticIdentity::signed_in(customer),
    );

    let result = handlers::create_ticket(
        State(state),
        HeaderMap::new(),
        Json(CreateTicketRequest {
            title: String::new(),
            description: "details".to_string(),
            priority: TicketPriority::Medium,
        }),
    )
    .await;

    assert!(matches!(result, Err(TicketsError::Validation(_))));
}
