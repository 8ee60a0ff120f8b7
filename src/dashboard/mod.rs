pub mod session;
pub mod types;
pub mod ws;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::shared::state::AppState;

pub use session::DashboardSession;
pub use types::{DashboardFrame, DashboardState};

pub fn configure_dashboard_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard", get(ws::handle_dashboard_socket))
}
