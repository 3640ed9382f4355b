//! Profile entity model
//!
//! This module contains the SeaORM entity model for the profiles table.
//! A profile's id matches the auth provider's user id; the role column
//! carries the coarse admin/user flag read at session start.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use utoipa::ToSchema;

/// Profile entity, 1:1 with an authenticated identity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Identifier matching the auth provider's user id (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Role flag: `admin` or `user`
    pub role: String,

    /// Display name (optional)
    pub full_name: Option<String>,

    /// Timestamp when the profile was created
    #[schema(value_type = String, example = "2025-01-01T12:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the profile was last updated
    #[schema(value_type = String, example = "2025-01-01T12:05:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this profile grants access to the admin surface.
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
