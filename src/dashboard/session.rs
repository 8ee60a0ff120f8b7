use crate::dashboard::types::{DashboardFrame, DashboardState};
use crate::directory::storage::RoleDirectory;
use crate::directory::types::UserRole;
use crate::realtime::{ChangeFeed, Subscription};
use crate::tickets::error::TicketsError;
use crate::tickets::store::TicketStore;
use crate::tickets::types::{Ticket, TicketStats};
use std::sync::Arc;
use uuid::Uuid;

/// One mounted view. Resolves the caller's role exactly once, then serves
/// full-list snapshots: fetch on open, refetch on every change event,
/// replace wholesale on success. The feed subscription is owned here and
/// released when the session drops.
pub struct DashboardSession {
    user_id: Uuid,
    role: Option<UserRole>,
    state: DashboardState,
    tickets: Vec<Ticket>,
    stats: Option<TicketStats>,
    store: Arc<dyn TicketStore>,
    subscription: Option<Subscription>,
}

impl DashboardSession {
    pub async fn open(
        user_id: Uuid,
        directory: &dyn RoleDirectory,
        store: Arc<dyn TicketStore>,
        feed: &ChangeFeed,
    ) -> Self {
        let role = directory.resolve_role(user_id).await;
        // No role, no dashboard: skip the fetch and the subscription.
        let subscription = role.map(|_| feed.subscribe());
        Self {
            user_id,
            role,
            state: DashboardState::Loading,
            tickets: Vec::new(),
            stats: None,
            store,
            subscription,
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.role
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn stats(&self) -> Option<TicketStats> {
        self.stats
    }

    /// Fetch the role-scoped ticket list. On success the list and derived
    /// stats are replaced wholesale; on failure the previous snapshot is
    /// left untouched and the error is returned for a one-line
    /// notification. No retry either way.
    pub async fn refresh(&mut self) -> Result<(), TicketsError> {
        let fetched = match self.role {
            Some(UserRole::Agent) => self.store.list_all().await?,
            Some(UserRole::Customer) => self.store.list_own(self.user_id).await?,
            None => return Ok(()),
        };

        self.stats = match self.role {
            Some(UserRole::Agent) => Some(TicketStats::from_tickets(&fetched)),
            _ => None,
        };
        self.tickets = fetched;
        self.state = DashboardState::Ready;
        Ok(())
    }

    /// Wait for the next change notification. Resolves `false` when the
    /// feed is closed or the session never subscribed.
    pub async fn changed(&mut self) -> bool {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.changed().await,
            None => false,
        }
    }

    pub fn snapshot(&self) -> DashboardFrame {
        match self.role {
            None => DashboardFrame::NoRole,
            Some(role) => DashboardFrame::Snapshot {
                role,
                state: self.state,
                tickets: self.tickets.clone(),
                stats: self.stats,
            },
        }
    }
}
