use crate::directory::types::UserRole;
use crate::shared::state::AppState;
use crate::tickets::error::TicketsError;
use crate::tickets::types::{
    ChangeStatusRequest, CreateTicketRequest, NewTicket, Ticket, TicketStats,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use log::{error, info};
use std::sync::Arc;
use uuid::Uuid;

async fn require_role(
    state: &AppState,
    headers: &HeaderMap,
    role: UserRole,
) -> Result<Uuid, TicketsError> {
    let user_id = state
        .identity
        .current_user(headers)
        .ok_or(TicketsError::Unauthenticated)?;
    match state.directory.resolve_role(user_id).await {
        Some(found) if found == role => Ok(user_id),
        _ => Err(TicketsError::Forbidden(format!(
            "Requires the {} role",
            role.as_str()
        ))),
    }
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateTicketRequest>,
) -> Result<Json<Ticket>, TicketsError> {
    let customer_id = require_role(&state, &headers, UserRole::Customer).await?;

    let ticket = state
        .store
        .create(NewTicket {
            title: req.title,
            description: req.description,
            priority: req.priority,
            customer_id,
        })
        .await
        .map_err(|e| {
            error!("Failed to create ticket: {}", e);
            e
        })?;

    info!("Ticket {} created by customer {}", ticket.id, customer_id);
    Ok(Json(ticket))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Ticket>>, TicketsError> {
    require_role(&state, &headers, UserRole::Agent).await?;
    let tickets = state.store.list_all().await?;
    Ok(Json(tickets))
}

pub async fn list_own_tickets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Ticket>>, TicketsError> {
    let customer_id = require_role(&state, &headers, UserRole::Customer).await?;
    let tickets = state.store.list_own(customer_id).await?;
    Ok(Json(tickets))
}

pub async fn change_status(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<Ticket>, TicketsError> {
    let agent_id = require_role(&state, &headers, UserRole::Agent).await?;

    let ticket = state
        .store
        .update_status(ticket_id, req.status, agent_id)
        .await
        .map_err(|e| {
            error!("Failed to update ticket {}: {}", ticket_id, e);
            e
        })?;

    info!(
        "Ticket {} moved to {} by agent {}",
        ticket.id,
        ticket.status.as_str(),
        agent_id
    );
    Ok(Json(ticket))
}

pub async fn get_ticket_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TicketStats>, TicketsError> {
    require_role(&state, &headers, UserRole::Agent).await?;
    let tickets = state.store.list_all().await?;
    Ok(Json(TicketStats::from_tickets(&tickets)))
}
