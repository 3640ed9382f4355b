//! # Task Repository
//!
//! CRUD for tasks. Every operation is scoped to the owning user: reads only
//! return the caller's rows, and mutations of another user's task surface
//! as not-found. Lists are ordered by creation time descending and joined
//! with company and person references.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::task::{
    ActiveModel as TaskActiveModel, Column, Entity as Task, Model as TaskModel,
};
use crate::models::{Company, EntityRef, Person, TaskPriority, TaskStatus, TaskWithRelations};

/// Request data for creating a task
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// One of `Open`, `In Progress`, `Completed`; defaults to `Open`
    pub status: Option<String>,
    /// One of `Low`, `Medium`, `High`; defaults to `Medium`
    pub priority: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub company_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
}

/// Partial update for a task. Absent fields are left unchanged; nullable
/// fields accept an explicit null to clear them.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, with = "super::double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, with = "super::double_option")]
    pub due_date: Option<Option<chrono::DateTime<chrono::Utc>>>,
    #[serde(default, with = "super::double_option")]
    pub company_id: Option<Option<Uuid>>,
    #[serde(default, with = "super::double_option")]
    pub person_id: Option<Option<Uuid>>,
}

/// Repository for task database operations
pub struct TaskRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TaskRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_task(
        &self,
        user_id: Uuid,
        request: CreateTaskRequest,
    ) -> Result<TaskModel, RepositoryError> {
        validate_title(&request.title)?;
        let status = parse_status(request.status.as_deref())?.unwrap_or(TaskStatus::Open);
        let priority = parse_priority(request.priority.as_deref())?.unwrap_or(TaskPriority::Medium);

        let now = Utc::now();
        let task = TaskActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(request.title.trim().to_string()),
            description: Set(request.description),
            status: Set(status.as_str().to_string()),
            priority: Set(priority.as_str().to_string()),
            due_date: Set(request.due_date.map(Into::into)),
            company_id: Set(request.company_id),
            person_id: Set(request.person_id),
            user_id: Set(user_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        task.insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Get one of the user's tasks, with its references joined.
    pub async fn get_task_by_id(
        &self,
        user_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<TaskWithRelations>, RepositoryError> {
        let task = self.find_owned(user_id, task_id).await?;
        match task {
            Some(task) => {
                let mut joined = self.join_relations(vec![task]).await?;
                Ok(joined.pop())
            }
            None => Ok(None),
        }
    }

    /// List the user's tasks, newest first, with references joined.
    pub async fn list_tasks(&self, user_id: Uuid) -> Result<Vec<TaskWithRelations>, RepositoryError> {
        let tasks = Task::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        self.join_relations(tasks).await
    }

    /// Apply a partial update to one of the user's tasks. `updated_at` is
    /// always set to now.
    pub async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        request: UpdateTaskRequest,
    ) -> Result<TaskModel, RepositoryError> {
        if let Some(title) = &request.title {
            validate_title(title)?;
        }
        let status = parse_status(request.status.as_deref())?;
        let priority = parse_priority(request.priority.as_deref())?;

        let task = self
            .find_owned(user_id, task_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Task not found".to_string()))?;

        let mut active = task.into_active_model();
        if let Some(title) = request.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(status) = status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(priority) = priority {
            active.priority = Set(priority.as_str().to_string());
        }
        if let Some(due_date) = request.due_date {
            active.due_date = Set(due_date.map(Into::into));
        }
        if let Some(company_id) = request.company_id {
            active.company_id = Set(company_id);
        }
        if let Some(person_id) = request.person_id {
            active.person_id = Set(person_id);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<(), RepositoryError> {
        let task = self
            .find_owned(user_id, task_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Task not found".to_string()))?;

        task.delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    async fn find_owned(
        &self,
        user_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<TaskModel>, RepositoryError> {
        Task::find_by_id(task_id)
            .filter(Column::UserId.eq(user_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Attaches company and person references with one batched lookup each.
    async fn join_relations(
        &self,
        tasks: Vec<TaskModel>,
    ) -> Result<Vec<TaskWithRelations>, RepositoryError> {
        let company_ids: Vec<Uuid> = tasks.iter().filter_map(|t| t.company_id).collect();
        let person_ids: Vec<Uuid> = tasks.iter().filter_map(|t| t.person_id).collect();

        let companies: HashMap<Uuid, EntityRef> = if company_ids.is_empty() {
            HashMap::new()
        } else {
            Company::find()
                .filter(crate::models::company::Column::Id.is_in(company_ids))
                .all(self.db)
                .await
                .map_err(RepositoryError::database_error)?
                .into_iter()
                .map(|c| (c.id, EntityRef { id: c.id, name: c.name }))
                .collect()
        };

        let people: HashMap<Uuid, EntityRef> = if person_ids.is_empty() {
            HashMap::new()
        } else {
            Person::find()
                .filter(crate::models::person::Column::Id.is_in(person_ids))
                .all(self.db)
                .await
                .map_err(RepositoryError::database_error)?
                .into_iter()
                .map(|p| (p.id, EntityRef { id: p.id, name: p.name }))
                .collect()
        };

        Ok(tasks
            .into_iter()
            .map(|task| {
                let company = task.company_id.and_then(|id| companies.get(&id).cloned());
                let person = task.person_id.and_then(|id| people.get(&id).cloned());
                TaskWithRelations {
                    task,
                    company,
                    person,
                }
            })
            .collect())
    }

    /// List the user's raw task rows, newest first, without joins. Used by
    /// the dashboard aggregation, which only needs status and due date.
    pub async fn list_task_rows(&self, user_id: Uuid) -> Result<Vec<TaskModel>, RepositoryError> {
        Task::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

fn validate_title(title: &str) -> Result<(), RepositoryError> {
    if title.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            "Task title cannot be empty",
        ));
    }
    Ok(())
}

fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, RepositoryError> {
    raw.map(|value| {
        TaskStatus::parse(value)
            .ok_or_else(|| RepositoryError::validation_error(format!("Unknown status '{value}'")))
    })
    .transpose()
}

fn parse_priority(raw: Option<&str>) -> Result<Option<TaskPriority>, RepositoryError> {
    raw.map(|value| {
        TaskPriority::parse(value)
            .ok_or_else(|| RepositoryError::validation_error(format!("Unknown priority '{value}'")))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use super::*;
    use crate::repositories::company::{CompanyRepository, CreateCompanyRequest};

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn create_request(title: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
            company_id: None,
            person_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_status_and_priority() {
        let db = setup_test_db().await;
        let repo = TaskRepository::new(&db);
        let user_id = Uuid::new_v4();

        let task = repo
            .create_task(user_id, create_request("Follow up"))
            .await
            .unwrap();
        assert_eq!(task.status, "Open");
        assert_eq!(task.priority, "Medium");
        assert_eq!(task.user_id, user_id);
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let db = setup_test_db().await;
        let repo = TaskRepository::new(&db);

        let mut request = create_request("Follow up");
        request.status = Some("Done".to_string());
        let result = repo.create_task(Uuid::new_v4(), request).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_tasks_scoped_to_owner() {
        let db = setup_test_db().await;
        let repo = TaskRepository::new(&db);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let task = repo.create_task(alice, create_request("Call Acme")).await.unwrap();
        repo.create_task(bob, create_request("Call Beta")).await.unwrap();

        let alice_tasks = repo.list_tasks(alice).await.unwrap();
        assert_eq!(alice_tasks.len(), 1);
        assert_eq!(alice_tasks[0].task.title, "Call Acme");

        // Bob cannot see or mutate Alice's task.
        assert!(repo.get_task_by_id(bob, task.id).await.unwrap().is_none());
        let result = repo
            .update_task(bob, task.id, UpdateTaskRequest::default())
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        let result = repo.delete_task(bob, task.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_joins_company_reference() {
        let db = setup_test_db().await;
        let user_id = Uuid::new_v4();

        let company_id = CompanyRepository::new(&db)
            .create_company(CreateCompanyRequest {
                name: "Acme".to_string(),
                industry: "Technology".to_string(),
                description: None,
                employees: None,
                website: None,
                phone: None,
                address: None,
                logo_color: None,
            })
            .await
            .unwrap()
            .id;

        let repo = TaskRepository::new(&db);
        let mut request = create_request("Call Acme");
        request.company_id = Some(company_id);
        repo.create_task(user_id, request).await.unwrap();

        let tasks = repo.list_tasks(user_id).await.unwrap();
        assert_eq!(tasks[0].company_name(), Some("Acme"));
        assert!(tasks[0].person.is_none());
    }

    #[tokio::test]
    async fn test_update_status_and_clear_due_date() {
        let db = setup_test_db().await;
        let repo = TaskRepository::new(&db);
        let user_id = Uuid::new_v4();

        let mut request = create_request("Follow up");
        request.due_date = Some(Utc::now());
        let task = repo.create_task(user_id, request).await.unwrap();

        let updated = repo
            .update_task(
                user_id,
                task.id,
                UpdateTaskRequest {
                    status: Some("Completed".to_string()),
                    due_date: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, "Completed");
        assert!(updated.due_date.is_none());
        assert!(updated.updated_at >= task.updated_at);
    }
}
