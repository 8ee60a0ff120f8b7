pub mod error;
pub mod handlers;
pub mod store;
pub mod types;

use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::shared::state::AppState;

pub use error::TicketsError;
pub use store::{PgTicketStore, TicketStore};
pub use types::{
    ChangeStatusRequest, CreateTicketRequest, NewTicket, Ticket, TicketPriority, TicketStats,
    TicketStatus,
};

pub fn configure_tickets_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route("/api/tickets/mine", get(handlers::list_own_tickets))
        .route("/api/tickets/stats", get(handlers::get_ticket_stats))
        .route("/api/tickets/:id/status", put(handlers::change_status))
}
