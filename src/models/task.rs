//! Task entity model
//!
//! This module contains the SeaORM entity model for the tasks table, the
//! fixed status/priority vocabularies, and the join view with company and
//! person references.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use utoipa::ToSchema;

use super::person::EntityRef;

/// Task entity; every task belongs to exactly one user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    /// Unique identifier for the task (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Short title of the task
    pub title: String,

    /// Free-text description (optional)
    pub description: Option<String>,

    /// Status: one of `Open`, `In Progress`, `Completed`
    pub status: String,

    /// Priority: one of `Low`, `Medium`, `High`
    pub priority: String,

    /// Due date (optional)
    #[schema(value_type = Option<String>, example = "2025-02-01T09:00:00Z")]
    pub due_date: Option<DateTimeWithTimeZone>,

    /// Company this task relates to (optional)
    pub company_id: Option<Uuid>,

    /// Person this task relates to (optional)
    pub person_id: Option<Uuid>,

    /// Owning user id from the auth provider
    pub user_id: Uuid,

    /// Timestamp when the task was created
    #[schema(value_type = String, example = "2025-01-01T12:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the task was last updated
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
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fixed task status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Chart display order for by-status aggregation.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Completed,
        TaskStatus::InProgress,
        TaskStatus::Open,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Parse a stored status string; unknown values are rejected.
    pub fn parse(value: &str) -> Option<TaskStatus> {
        match value {
            "Open" => Some(TaskStatus::Open),
            "In Progress" => Some(TaskStatus::InProgress),
            "Completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Fixed task priority vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }

    pub fn parse(value: &str) -> Option<TaskPriority> {
        match value {
            "Low" => Some(TaskPriority::Low),
            "Medium" => Some(TaskPriority::Medium),
            "High" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Task row joined with its company and person references for display.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TaskWithRelations {
    /// The task row itself
    #[serde(flatten)]
    pub task: Model,
    /// Company reference, when the task is linked to a company
    pub company: Option<EntityRef>,
    /// Person reference, when the task is linked to a person
    pub person: Option<EntityRef>,
}

impl TaskWithRelations {
    /// Company name as a facet/search key; absent when no company is linked.
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.name.as_str())
    }
}
