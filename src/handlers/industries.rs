//! # Industry API Handlers
//!
//! CRUD endpoints for industries.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::industry::Model as IndustryModel;
use crate::repositories::{CreateIndustryRequest, IndustryRepository, UpdateIndustryRequest};
use crate::server::AppState;

/// List industries ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/industries",
    responses(
        (status = 200, description = "Industries ordered by name", body = Vec<IndustryModel>),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "industries"
)]
pub async fn list_industries(
    State(state): State<AppState>,
) -> Result<Json<Vec<IndustryModel>>, ApiError> {
    let repo = IndustryRepository::new(&state.db);
    Ok(Json(repo.list_industries().await?))
}

/// Get a single industry
#[utoipa::path(
    get,
    path = "/api/v1/industries/{id}",
    params(("id" = Uuid, Path, description = "Industry id")),
    responses(
        (status = 200, description = "The industry", body = IndustryModel),
        (status = 404, description = "Industry not found", body = ApiError)
    ),
    tag = "industries"
)]
pub async fn get_industry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IndustryModel>, ApiError> {
    let repo = IndustryRepository::new(&state.db);
    let industry = repo
        .get_industry_by_id(id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Industry not found"))?;
    Ok(Json(industry))
}

/// Create an industry
#[utoipa::path(
    post,
    path = "/api/v1/industries",
    request_body = CreateIndustryRequest,
    responses(
        (status = 201, description = "Created industry", body = IndustryModel),
        (status = 400, description = "Validation error", body = ApiError)
    ),
    tag = "industries"
)]
pub async fn create_industry(
    State(state): State<AppState>,
    Json(request): Json<CreateIndustryRequest>,
) -> Result<(StatusCode, Json<IndustryModel>), ApiError> {
    let repo = IndustryRepository::new(&state.db);
    let industry = repo.create_industry(request).await?;
    tracing::info!(industry_id = %industry.id, "Created industry");
    Ok((StatusCode::CREATED, Json(industry)))
}

/// Apply a partial update to an industry. Renaming does not touch
/// companies still carrying the old name.
#[utoipa::path(
    patch,
    path = "/api/v1/industries/{id}",
    params(("id" = Uuid, Path, description = "Industry id")),
    request_body = UpdateIndustryRequest,
    responses(
        (status = 200, description = "Updated industry", body = IndustryModel),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 404, description = "Industry not found", body = ApiError)
    ),
    tag = "industries"
)]
pub async fn update_industry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateIndustryRequest>,
) -> Result<Json<IndustryModel>, ApiError> {
    let repo = IndustryRepository::new(&state.db);
    Ok(Json(repo.update_industry(id, request).await?))
}

/// Delete an industry. Dependent companies keep the orphaned name string.
#[utoipa::path(
    delete,
    path = "/api/v1/industries/{id}",
    params(("id" = Uuid, Path, description = "Industry id")),
    responses(
        (status = 204, description = "Industry deleted"),
        (status = 404, description = "Industry not found", body = ApiError)
    ),
    tag = "industries"
)]
pub async fn delete_industry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = IndustryRepository::new(&state.db);
    repo.delete_industry(id).await?;
    tracing::info!(industry_id = %id, "Deleted industry");
    Ok(StatusCode::NO_CONTENT)
}
