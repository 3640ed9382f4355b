//! Industry entity model
//!
//! This module contains the SeaORM entity model for the industries table.
//! Companies reference industries by name equality only; deleting an
//! industry does not cascade to the companies that carry its name.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use utoipa::ToSchema;

/// Industry entity used to categorize companies
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "industries")]
pub struct Model {
    /// Unique identifier for the industry (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Industry name (unique)
    pub name: String,

    /// Free-text description (optional)
    pub description: Option<String>,

    /// Timestamp when the industry was created
    #[schema(value_type = String, example = "2025-01-01T12:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the industry was last updated
    #[schema(value_type = String, example = "2025-01-01T12:05:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
