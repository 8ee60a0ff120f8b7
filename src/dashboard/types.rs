use crate::directory::types::UserRole;
use crate::tickets::types::{Ticket, TicketStats};
use serde::Serialize;

/// View lifecycle. `Ready` is re-entered on every successful fetch; there
/// is no distinct error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardState {
    Loading,
    Ready,
}

/// Frames pushed to a connected dashboard. Always a full replacement,
/// never a delta.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardFrame {
    Snapshot {
        role: UserRole,
        state: DashboardState,
        tickets: Vec<Ticket>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stats: Option<TicketStats>,
    },
    /// The signed-in user has no role row; neither dashboard variant mounts.
    NoRole,
    /// One-line transient notification. The last good snapshot stays valid.
    Error {
        message: String,
    },
}
