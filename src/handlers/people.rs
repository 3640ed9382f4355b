//! # People API Handlers
//!
//! CRUD endpoints for people. Listing joins the company reference and
//! accepts the shared filter query parameters; the company facet compares
//! by company name.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{PersonWithCompany, person::Model as PersonModel};
use crate::query::filter::{FilterParams, PersonFilter};
use crate::repositories::{CreatePersonRequest, PersonRepository, UpdatePersonRequest};
use crate::server::AppState;

/// List people, optionally filtered by term, company, and department
#[utoipa::path(
    get,
    path = "/api/v1/people",
    params(FilterParams),
    responses(
        (status = 200, description = "People ordered by name, with company references", body = Vec<PersonWithCompany>),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "people"
)]
pub async fn list_people(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<PersonWithCompany>>, ApiError> {
    let repo = PersonRepository::new(&state.db);
    let people = repo.list_people().await?;
    let filter = PersonFilter::from_params(&params);
    Ok(Json(filter.apply(people)))
}

/// Get a single person with their company reference
#[utoipa::path(
    get,
    path = "/api/v1/people/{id}",
    params(("id" = Uuid, Path, description = "Person id")),
    responses(
        (status = 200, description = "The person", body = PersonWithCompany),
        (status = 404, description = "Person not found", body = ApiError)
    ),
    tag = "people"
)]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PersonWithCompany>, ApiError> {
    let repo = PersonRepository::new(&state.db);
    let person = repo
        .get_person_by_id(id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Person not found"))?;
    Ok(Json(person))
}

/// Create a person
#[utoipa::path(
    post,
    path = "/api/v1/people",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Created person", body = PersonModel),
        (status = 400, description = "Validation error", body = ApiError)
    ),
    tag = "people"
)]
pub async fn create_person(
    State(state): State<AppState>,
    Json(request): Json<CreatePersonRequest>,
) -> Result<(StatusCode, Json<PersonModel>), ApiError> {
    let repo = PersonRepository::new(&state.db);
    let person = repo.create_person(request).await?;
    tracing::info!(person_id = %person.id, "Created person");
    Ok((StatusCode::CREATED, Json(person)))
}

/// Apply a partial update to a person
#[utoipa::path(
    patch,
    path = "/api/v1/people/{id}",
    params(("id" = Uuid, Path, description = "Person id")),
    request_body = UpdatePersonRequest,
    responses(
        (status = 200, description = "Updated person", body = PersonModel),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 404, description = "Person not found", body = ApiError)
    ),
    tag = "people"
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePersonRequest>,
) -> Result<Json<PersonModel>, ApiError> {
    let repo = PersonRepository::new(&state.db);
    Ok(Json(repo.update_person(id, request).await?))
}

/// Delete a person
#[utoipa::path(
    delete,
    path = "/api/v1/people/{id}",
    params(("id" = Uuid, Path, description = "Person id")),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 404, description = "Person not found", body = ApiError)
    ),
    tag = "people"
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = PersonRepository::new(&state.db);
    repo.delete_person(id).await?;
    tracing::info!(person_id = %id, "Deleted person");
    Ok(StatusCode::NO_CONTENT)
}
