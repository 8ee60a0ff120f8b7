pub mod error;
pub mod handlers;
pub mod identity;
pub mod storage;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::shared::state::AppState;

pub use error::DirectoryError;
pub use identity::{HeaderIdentity, IdentityProvider, AUTH_USER_HEADER};
pub use storage::{PgRoleDirectory, RoleDirectory};
pub use types::UserRole;

pub fn configure_directory_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/directory/roles", post(handlers::assign_role))
        .route("/api/directory/roles/:user_id", get(handlers::get_role))
        .route("/api/directory/profiles", post(handlers::create_profile))
}
