//! Company entity model
//!
//! This module contains the SeaORM entity model for the companies table.
//! The industry column is a denormalized name string, not a foreign key;
//! renaming an industry leaves companies carrying the old name.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use utoipa::ToSchema;

/// Company entity representing an account in the CRM
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier for the company (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Display name of the company
    pub name: String,

    /// Industry name, copied from the industries table at edit time
    pub industry: String,

    /// Free-text description (optional)
    pub description: Option<String>,

    /// Employee count (optional)
    pub employees: Option<i32>,

    /// Website URL (optional)
    pub website: Option<String>,

    /// Phone number (optional)
    pub phone: Option<String>,

    /// Postal address (optional)
    pub address: Option<String>,

    /// Display color tag for the company logo placeholder
    pub logo_color: String,

    /// Timestamp when the company was created
    #[schema(value_type = String, example = "2025-01-01T12:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the company was last updated
    #[schema(value_type = String, example = "2025-01-01T12:05:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::person::Entity")]
    Person,
    #[sea_orm(has_many = "super::task::Entity")]
    Task,
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
