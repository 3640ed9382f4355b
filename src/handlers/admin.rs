//! # Admin API Handlers
//!
//! User administration: listing profiles and changing roles. Every endpoint
//! requires an admin profile; non-admin callers receive a redirect decision
//! before any data is read.

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::models::profile::Model as ProfileModel;
use crate::repositories::ProfileRepository;
use crate::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// One of `admin`, `user`
    pub role: String,
}

/// List all user profiles
#[utoipa::path(
    get,
    path = "/api/v1/admin/profiles",
    responses(
        (status = 200, description = "All profiles, oldest first", body = Vec<ProfileModel>),
        (status = 401, description = "Sign-in required", body = ApiError),
        (status = 403, description = "Admin role required", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<ProfileModel>>, ApiError> {
    let repo = ProfileRepository::new(&state.db);
    Ok(Json(repo.list_profiles().await?))
}

/// Change a profile's role
#[utoipa::path(
    patch,
    path = "/api/v1/admin/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileModel),
        (status = 400, description = "Unknown role", body = ApiError),
        (status = 401, description = "Sign-in required", body = ApiError),
        (status = 403, description = "Admin role required", body = ApiError),
        (status = 404, description = "Profile not found", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn update_role(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<ProfileModel>, ApiError> {
    let repo = ProfileRepository::new(&state.db);
    let profile = repo.update_role(id, &request.role).await?;
    tracing::info!(
        admin_id = %admin.identity.user_id,
        profile_id = %id,
        role = %profile.role,
        "Changed profile role"
    );
    Ok(Json(profile))
}
