//! # Profile Repository
//!
//! Reads and role updates for user profiles. Profiles are created when an
//! account signs up; the admin surface lists them and flips roles.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::profile::{
    ActiveModel as ProfileActiveModel, Column, Entity as Profile, Model as ProfileModel,
};

const ROLES: [&str; 2] = ["admin", "user"];

/// Repository for profile database operations
pub struct ProfileRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileModel>, RepositoryError> {
        Profile::find_by_id(user_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// List all profiles, oldest first.
    pub async fn list_profiles(&self) -> Result<Vec<ProfileModel>, RepositoryError> {
        Profile::find()
            .order_by_asc(Column::CreatedAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Creates the profile row for a fresh sign-up if the auth provider has
    /// not already done so.
    pub async fn ensure_profile(
        &self,
        user_id: Uuid,
        full_name: Option<String>,
    ) -> Result<ProfileModel, RepositoryError> {
        if let Some(existing) = self.get_profile(user_id).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let profile = ProfileActiveModel {
            id: Set(user_id),
            role: Set("user".to_string()),
            full_name: Set(full_name),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        profile
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Sets a profile's role. Only the fixed vocabulary is accepted.
    pub async fn update_role(
        &self,
        user_id: Uuid,
        role: &str,
    ) -> Result<ProfileModel, RepositoryError> {
        if !ROLES.contains(&role) {
            return Err(RepositoryError::validation_error(format!(
                "Unknown role '{role}'"
            )));
        }

        let profile = self
            .get_profile(user_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Profile not found".to_string()))?;

        let mut active = profile.into_active_model();
        active.role = Set(role.to_string());
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use super::*;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_ensure_profile_is_idempotent() {
        let db = setup_test_db().await;
        let repo = ProfileRepository::new(&db);
        let user_id = Uuid::new_v4();

        let first = repo
            .ensure_profile(user_id, Some("Ada".to_string()))
            .await
            .unwrap();
        assert_eq!(first.role, "user");

        let second = repo.ensure_profile(user_id, None).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_update_role() {
        let db = setup_test_db().await;
        let repo = ProfileRepository::new(&db);
        let user_id = Uuid::new_v4();

        repo.ensure_profile(user_id, None).await.unwrap();
        let updated = repo.update_role(user_id, "admin").await.unwrap();
        assert!(updated.is_admin());

        let result = repo.update_role(user_id, "superuser").await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_role_missing_profile() {
        let db = setup_test_db().await;
        let repo = ProfileRepository::new(&db);

        let result = repo.update_role(Uuid::new_v4(), "admin").await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
