//! Person entity model
//!
//! This module contains the SeaORM entity model for the people table, plus
//! the join view returned by list/get operations (person with an optional
//! `{id, name}` company reference).

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Person entity representing a contact in the CRM
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "people")]
pub struct Model {
    /// Unique identifier for the person (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Full name of the person
    pub name: String,

    /// Job title (optional)
    pub position: Option<String>,

    /// Company this person belongs to (optional)
    pub company_id: Option<Uuid>,

    /// Email address (optional)
    pub email: Option<String>,

    /// Phone number (optional)
    pub phone: Option<String>,

    /// Department name (optional)
    pub department: Option<String>,

    /// Location (optional)
    pub location: Option<String>,

    /// Display color tag for the avatar placeholder
    pub avatar_color: String,

    /// Timestamp when the person was created
    #[schema(value_type = String, example = "2025-01-01T12:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the person was last updated
    #[schema(value_type = String, example = "2025-01-01T12:05:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(has_many = "super::task::Entity")]
    Task,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Minimal `{id, name}` reference to a related entity, used by join views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    /// Identifier of the referenced row
    pub id: Uuid,
    /// Display name of the referenced row
    pub name: String,
}

/// Person row joined with its company reference for display.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PersonWithCompany {
    /// The person row itself
    #[serde(flatten)]
    pub person: Model,
    /// Company reference, when the person belongs to one
    pub company: Option<EntityRef>,
}

impl PersonWithCompany {
    /// Company name as a facet/search key; absent when no company is linked.
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.name.as_str())
    }
}
