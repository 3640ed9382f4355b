//! # Company API Handlers
//!
//! CRUD endpoints for companies. Listing accepts the shared filter query
//! parameters; filtering happens in the query layer over the fetched rows.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::query::filter::{CompanyFilter, FilterParams};
use crate::repositories::{CompanyRepository, CreateCompanyRequest, UpdateCompanyRequest};
use crate::server::AppState;

/// List companies, optionally filtered by search term and industry
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    params(FilterParams),
    responses(
        (status = 200, description = "Companies ordered by name", body = Vec<crate::models::company::Model>),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<crate::models::company::Model>>, ApiError> {
    let repo = CompanyRepository::new(&state.db);
    let companies = repo.list_companies().await?;
    let filter = CompanyFilter::from_params(&params);
    Ok(Json(filter.apply(companies)))
}

/// Get a single company
#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "The company", body = crate::models::company::Model),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<crate::models::company::Model>, ApiError> {
    let repo = CompanyRepository::new(&state.db);
    let company = repo
        .get_company_by_id(id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Company not found"))?;
    Ok(Json(company))
}

/// Create a company
#[utoipa::path(
    post,
    path = "/api/v1/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Created company", body = crate::models::company::Model),
        (status = 400, description = "Validation error", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<AppState>,
    Json(request): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<crate::models::company::Model>), ApiError> {
    let repo = CompanyRepository::new(&state.db);
    let company = repo.create_company(request).await?;
    tracing::info!(company_id = %company.id, "Created company");
    Ok((StatusCode::CREATED, Json(company)))
}

/// Apply a partial update to a company
#[utoipa::path(
    patch,
    path = "/api/v1/companies/{id}",
    params(("id" = Uuid, Path, description = "Company id")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Updated company", body = crate::models::company::Model),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCompanyRequest>,
) -> Result<Json<crate::models::company::Model>, ApiError> {
    let repo = CompanyRepository::new(&state.db);
    let company = repo.update_company(id, request).await?;
    Ok(Json(company))
}

/// Delete a company
#[utoipa::path(
    delete,
    path = "/api/v1/companies/{id}",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found", body = ApiError)
    ),
    tag = "companies"
)]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = CompanyRepository::new(&state.db);
    repo.delete_company(id).await?;
    tracing::info!(company_id = %id, "Deleted company");
    Ok(StatusCode::NO_CONTENT)
}
