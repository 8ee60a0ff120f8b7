//! Deterministic stand-ins for the storage and identity seams. Used by the
//! integration tests; no database or auth proxy required.

use crate::directory::storage::RoleDirectory;
use crate::directory::types::UserRole;
use crate::realtime::{ChangeFeed, RowOp};
use crate::tickets::error::TicketsError;
use crate::tickets::store::TicketStore;
use crate::tickets::types::{NewTicket, Ticket, TicketStatus};
use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory ticket collection with the same contract as the Postgres
/// store, including the change-feed publication on every write.
pub struct MemoryTicketStore {
    tickets: Mutex<Vec<Ticket>>,
    feed: ChangeFeed,
    fail_reads: AtomicBool,
}

impl MemoryTicketStore {
    pub fn new(feed: ChangeFeed) -> Self {
        Self {
            tickets: Mutex::new(Vec::new()),
            feed,
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Make subsequent reads fail, for exercising the fetch-failure path.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), TicketsError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TicketsError::Database("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn sorted_desc(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn list_all(&self) -> Result<Vec<Ticket>, TicketsError> {
        self.check_reads()?;
        let tickets = self.tickets.lock().unwrap().clone();
        Ok(Self::sorted_desc(tickets))
    }

    async fn list_own(&self, customer_id: Uuid) -> Result<Vec<Ticket>, TicketsError> {
        self.check_reads()?;
        let tickets = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.customer_id == customer_id)
            .cloned()
            .collect();
        Ok(Self::sorted_desc(tickets))
    }

    async fn create(&self, new_ticket: NewTicket) -> Result<Ticket, TicketsError> {
        new_ticket.validate()?;
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
        self.tickets.lock().unwrap().push(ticket.clone());
        self.feed.publish(RowOp::Insert);
        Ok(ticket)
    }

    async fn update_status(
        &self,
        ticket_id: Uuid,
        new_status: TicketStatus,
        agent_id: Uuid,
    ) -> Result<Ticket, TicketsError> {
        let updated = {
            let mut tickets = self.tickets.lock().unwrap();
            let ticket = tickets
                .iter_mut()
                .find(|t| t.id == ticket_id)
                .ok_or(TicketsError::NotFound)?;
            ticket.status = new_status;
            ticket.agent_id = Some(agent_id);
            ticket.clone()
        };
        self.feed.publish(RowOp::Update);
        Ok(updated)
    }
}

/// Role table seeded up front.
#[derive(Default)]
pub struct MemoryRoleDirectory {
    roles: Mutex<HashMap<Uuid, UserRole>>,
}

impl MemoryRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(self, user_id: Uuid, role: UserRole) -> Self {
        self.roles.lock().unwrap().insert(user_id, role);
        self
    }
}

#[async_trait]
impl RoleDirectory for MemoryRoleDirectory {
    async fn resolve_role(&self, user_id: Uuid) -> Option<UserRole> {
        self.roles.lock().unwrap().get(&user_id).copied()
    }
}

/// Identity pinned at construction, regardless of request headers.
pub struct StaticIdentity {
    user: Option<Uuid>,
}

impl StaticIdentity {
    pub fn signed_in(user: Uuid) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl crate::directory::identity::IdentityProvider for StaticIdentity {
    fn current_user(&self, _headers: &HeaderMap) -> Option<Uuid> {
        self.user
    }
}

/// Full [`AppState`](crate::shared::state::AppState) wired to the in-memory
/// seams. The pool is never connected; handlers that only touch the trait
/// objects work without a database.
pub fn test_state(
    directory: MemoryRoleDirectory,
    identity: StaticIdentity,
) -> std::sync::Arc<crate::shared::state::AppState> {
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel::PgConnection;
    use std::sync::Arc;

    let feed = ChangeFeed::new(16);
    let store = Arc::new(MemoryTicketStore::new(feed.clone()));
    let manager = ConnectionManager::<PgConnection>::new("postgres://unused:@localhost/unused");
    let pool = Pool::builder().build_unchecked(manager);

    Arc::new(crate::shared::state::AppState {
        conn: pool,
        config: None,
        store,
        directory: Arc::new(directory),
        identity: Arc::new(identity),
        change_feed: feed,
    })
}
