//! Combines the per-module routers into the unified API surface.

use axum::Router;
use std::sync::Arc;

use crate::shared::state::AppState;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(crate::tickets::configure_tickets_routes())
        .merge(crate::directory::configure_directory_routes())
        .merge(crate::dashboard::configure_dashboard_routes())
        .merge(crate::realtime::configure_realtime_routes())
}
