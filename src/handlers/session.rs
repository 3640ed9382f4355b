//! # Session API Handlers
//!
//! Sign-in, sign-up, sign-out, and the current-session snapshot. These
//! drive the session manager; the manager in turn talks to the external
//! auth provider and keeps the process-wide state converged.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentSession;
use crate::error::ApiError;
use crate::repositories::ProfileRepository;
use crate::server::AppState;
use crate::session::{Identity, SessionState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Profile summary attached to an authenticated session
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileInfo {
    pub role: String,
    pub full_name: Option<String>,
}

/// Snapshot of the session state machine
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// One of `loading`, `anonymous`, `authenticated`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileInfo>,
    pub is_admin: bool,
}

impl From<SessionState> for SessionResponse {
    fn from(state: SessionState) -> Self {
        let is_admin = state.is_admin();
        match state {
            SessionState::Loading => SessionResponse {
                status: "loading",
                identity: None,
                profile: None,
                is_admin: false,
            },
            SessionState::Anonymous => SessionResponse {
                status: "anonymous",
                identity: None,
                profile: None,
                is_admin: false,
            },
            SessionState::Authenticated { identity, profile } => SessionResponse {
                status: "authenticated",
                identity: Some(identity),
                profile: profile.map(|p| ProfileInfo {
                    role: p.role,
                    full_name: p.full_name,
                }),
                is_admin,
            },
        }
    }
}

/// Current session snapshot
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session state", body = SessionResponse)
    ),
    tag = "session"
)]
pub async fn current_session(CurrentSession(state): CurrentSession) -> Json<SessionResponse> {
    Json(state.into())
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/session/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Credentials rejected", body = ApiError),
        (status = 502, description = "Auth provider unavailable", body = ApiError)
    ),
    tag = "session"
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .sessions
        .sign_in(&request.email, &request.password)
        .await?;
    tracing::info!("User signed in");
    Ok(Json(session.into()))
}

/// Register a new account and sign it in
#[utoipa::path(
    post,
    path = "/api/v1/session/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 502, description = "Auth provider unavailable", body = ApiError)
    ),
    tag = "session"
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = state
        .sessions
        .sign_up(&request.email, &request.password, request.full_name.as_deref())
        .await?;

    // Best-effort: make sure a profile row exists for the new account.
    if let Some(identity) = session.identity() {
        let repo = ProfileRepository::new(&state.db);
        if let Err(err) = repo
            .ensure_profile(identity.user_id, request.full_name.clone())
            .await
        {
            tracing::warn!(user_id = %identity.user_id, error = %err, "Profile creation failed");
        }
    }

    tracing::info!("User signed up");
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Sign out. The session only becomes anonymous once the provider
/// confirms; on provider failure the previous state is kept and an error
/// is returned.
#[utoipa::path(
    post,
    path = "/api/v1/session/sign-out",
    responses(
        (status = 204, description = "Signed out"),
        (status = 502, description = "Auth provider unavailable", body = ApiError)
    ),
    tag = "session"
)]
pub async fn sign_out(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.sessions.sign_out().await?;
    tracing::info!("User signed out");
    Ok(StatusCode::NO_CONTENT)
}
