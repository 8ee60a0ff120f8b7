use crate::directory::error::DirectoryError;
use crate::directory::types::{Profile, RoleAssignment, UserRole};
use crate::shared::schema::{profiles, user_roles};
use crate::shared::utils::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// Role lookup seam. One row per user; a missing row and a failed lookup
/// are indistinguishable to callers.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn resolve_role(&self, user_id: Uuid) -> Option<UserRole>;
}

pub struct PgRoleDirectory {
    pool: DbPool,
}

impl PgRoleDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleDirectory for PgRoleDirectory {
    async fn resolve_role(&self, user_id: Uuid) -> Option<UserRole> {
        let mut conn = self.pool.get().ok()?;
        user_roles::table
            .find(user_id)
            .select(user_roles::role)
            .first::<UserRole>(&mut conn)
            .ok()
    }
}

/// Record a user's role at signup. One row per user; a second assignment
/// fails on the primary key.
pub fn assign_role(pool: &DbPool, user_id: Uuid, role: UserRole) -> Result<(), DirectoryError> {
    let mut conn = pool.get()?;
    diesel::insert_into(user_roles::table)
        .values(&RoleAssignment { user_id, role })
        .execute(&mut conn)?;
    Ok(())
}

pub fn create_profile(
    pool: &DbPool,
    user_id: Uuid,
    email: String,
    full_name: Option<String>,
) -> Result<Profile, DirectoryError> {
    let mut conn = pool.get()?;
    let profile = Profile {
        id: user_id,
        email,
        full_name,
        created_at: Utc::now(),
    };
    diesel::insert_into(profiles::table)
        .values(&profile)
        .execute(&mut conn)?;
    Ok(profile)
}
