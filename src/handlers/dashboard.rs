//! # Dashboard Handler
//!
//! Aggregates the dashboard payload: chart counts, overdue total, and
//! recent-items lists. The four collection fetches are issued concurrently;
//! the aggregation itself is pure and happens in the query layer.

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::RequireIdentity;
use crate::error::ApiError;
use crate::models::{PersonWithCompany, TaskWithRelations};
use crate::query::dashboard::{
    CategoryCount, companies_by_industry, is_overdue, recent, tasks_by_status,
};
use crate::repositories::{
    CompanyRepository, IndustryRepository, PersonRepository, TaskRepository,
};
use crate::server::AppState;

/// Everything the dashboard renders in one payload
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub total_companies: u64,
    pub total_people: u64,
    pub total_tasks: u64,
    pub overdue_tasks: u64,
    /// Companies per industry, zero-count industries dropped
    pub companies_by_industry: Vec<CategoryCount>,
    /// The caller's tasks per status, zero-count statuses dropped
    pub tasks_by_status: Vec<CategoryCount>,
    /// The caller's four newest tasks
    pub recent_tasks: Vec<TaskWithRelations>,
    /// The four newest people
    pub recent_people: Vec<PersonWithCompany>,
}

/// Dashboard aggregates for the signed-in user
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates", body = DashboardSummary),
        (status = 401, description = "Sign-in required", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<DashboardSummary>, ApiError> {
    let companies_repo = CompanyRepository::new(&state.db);
    let industries_repo = IndustryRepository::new(&state.db);
    let people_repo = PersonRepository::new(&state.db);
    let tasks_repo = TaskRepository::new(&state.db);

    let (companies, industries, people, tasks, task_rows) = tokio::join!(
        companies_repo.list_companies(),
        industries_repo.list_industries(),
        people_repo.list_people(),
        tasks_repo.list_tasks(identity.user_id),
        tasks_repo.list_task_rows(identity.user_id),
    );
    let (companies, industries, people, tasks, task_rows) =
        (companies?, industries?, people?, tasks?, task_rows?);

    let now = Utc::now();
    let mut people_by_recency = people.clone();
    people_by_recency.sort_by(|a, b| b.person.created_at.cmp(&a.person.created_at));

    let summary = DashboardSummary {
        total_companies: companies.len() as u64,
        total_people: people.len() as u64,
        total_tasks: task_rows.len() as u64,
        overdue_tasks: task_rows
            .iter()
            .filter(|task| is_overdue(task, now))
            .count() as u64,
        companies_by_industry: companies_by_industry(&industries, &companies),
        tasks_by_status: tasks_by_status(&task_rows),
        recent_tasks: recent(tasks),
        recent_people: recent(people_by_recency),
    };

    Ok(Json(summary))
}
