use crate::realtime::{ChangeFeed, RowOp};
use crate::shared::schema::tickets;
use crate::shared::utils::DbPool;
use crate::tickets::error::TicketsError;
use crate::tickets::types::{NewTicket, Ticket, TicketStatus};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// Storage seam for the ticket collection. The Postgres implementation is
/// the production store; tests run against an in-memory one.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Every ticket, newest first. Agent views only.
    async fn list_all(&self) -> Result<Vec<Ticket>, TicketsError>;

    /// The caller's own tickets, newest first.
    async fn list_own(&self, customer_id: Uuid) -> Result<Vec<Ticket>, TicketsError>;

    /// Insert a new ticket: status `open`, no agent, store-generated id and
    /// timestamp.
    async fn create(&self, new_ticket: NewTicket) -> Result<Ticket, TicketsError>;

    /// Set the status and unconditionally stamp the acting agent. Last
    /// write wins; concurrent updates are not detected.
    async fn update_status(
        &self,
        ticket_id: Uuid,
        new_status: TicketStatus,
        agent_id: Uuid,
    ) -> Result<Ticket, TicketsError>;
}

pub struct PgTicketStore {
    pool: DbPool,
    feed: ChangeFeed,
}

impl PgTicketStore {
    pub fn new(pool: DbPool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn list_all(&self) -> Result<Vec<Ticket>, TicketsError> {
        let mut conn = self.pool.get()?;
        let rows = tickets::table
            .order(tickets::created_at.desc())
            .load(&mut conn)?;
        Ok(rows)
    }

    async fn list_own(&self, customer_id: Uuid) -> Result<Vec<Ticket>, TicketsError> {
        let mut conn = self.pool.get()?;
        let rows = tickets::table
            .filter(tickets::customer_id.eq(customer_id))
            .order(tickets::created_at.desc())
            .load(&mut conn)?;
        Ok(rows)
    }

    async fn create(&self, new_ticket: NewTicket) -> Result<Ticket, TicketsError> {
        new_ticket.validate()?;
        let mut conn = self.pool.get()?;

        let ticket = Ticket {
            id: Uuid::new_v4(),
            title: new_ticket.title,
            description: new_ticket.description,
            status: TicketStatus::Open,
            priority: new_ticket.priority,
            customer_id: new_ticket.customer_id,
            agent_id: None,
            created_at: Utc::now(),
        };

        diesel::insert_into(tickets::table)
            .values(&ticket)
            .execute(&mut conn)?;

        self.feed.publish(RowOp::Insert);
        Ok(ticket)
    }

    async fn update_status(
        &self,
        ticket_id: Uuid,
        new_status: TicketStatus,
        agent_id: Uuid,
    ) -> Result<Ticket, TicketsError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(tickets::table.filter(tickets::id.eq(ticket_id)))
            .set((
                tickets::status.eq(new_status),
                tickets::agent_id.eq(Some(agent_id)),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(TicketsError::NotFound);
        }

        let ticket = tickets::table
            .filter(tickets::id.eq(ticket_id))
            .first(&mut conn)?;

        self.feed.publish(RowOp::Update);
        Ok(ticket)
    }
}
