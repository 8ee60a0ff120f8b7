use crate::directory::error::DirectoryError;
use crate::directory::storage;
use crate::directory::types::{AssignRoleRequest, CreateProfileRequest, Profile, RoleResponse};
use crate::shared::state::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use log::{error, info};
use std::sync::Arc;
use uuid::Uuid;

fn require_self(
    state: &AppState,
    headers: &HeaderMap,
    user_id: Uuid,
) -> Result<(), DirectoryError> {
    let caller = state
        .identity
        .current_user(headers)
        .ok_or(DirectoryError::Unauthenticated)?;
    if caller != user_id {
        return Err(DirectoryError::Forbidden(
            "Signup records can only be created for yourself".to_string(),
        ));
    }
    Ok(())
}

/// Signup step: record the chosen role. Happens once; a repeat insert
/// surfaces as the generic database error.
pub async fn assign_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<serde_json::Value>, DirectoryError> {
    require_self(&state, &headers, req.user_id)?;

    storage::assign_role(&state.conn, req.user_id, req.role).map_err(|e| {
        error!("Failed to assign role for {}: {}", req.user_id, e);
        e
    })?;

    info!("Assigned role {} to user {}", req.role.as_str(), req.user_id);
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Role lookup. A user without a row gets `null`, not an error.
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Json<RoleResponse> {
    let role = state.directory.resolve_role(user_id).await;
    Json(RoleResponse { role })
}

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Json<Profile>, DirectoryError> {
    require_self(&state, &headers, req.user_id)?;

    let profile =
        storage::create_profile(&state.conn, req.user_id, req.email, req.full_name).map_err(
            |e| {
                error!("Failed to create profile for {}: {}", req.user_id, e);
                e
            },
        )?;

    info!("Created profile for user {}", profile.id);
    Ok(Json(profile))
}
