//! # Authorization Gates
//!
//! Explicit access checks evaluated before a protected handler runs. Each
//! check inspects a session snapshot and returns a tagged decision rather
//! than failing mid-response: granted, sign-in prompt, or redirect. The
//! axum extractors below turn those decisions into responses, so a handler
//! that receives its extractor output is already authorized.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};

use crate::error::ApiError;
use crate::models::profile;
use crate::session::{Identity, SessionManager, SessionState};

/// Outcome of an access check, decided before any protected data is read.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    Granted {
        identity: Identity,
        profile: Option<profile::Model>,
    },
    /// No identity present: the caller should be prompted to sign in.
    SignInRequired,
    /// Identity present but lacking the required role: the caller should be
    /// redirected away with a notification.
    Redirect { to: &'static str, reason: &'static str },
}

/// Checks that an identity is present. Anonymous and still-loading sessions
/// both resolve to a sign-in prompt.
pub fn check_identity(state: &SessionState) -> AccessDecision {
    match state {
        SessionState::Authenticated { identity, profile } => AccessDecision::Granted {
            identity: identity.clone(),
            profile: profile.clone(),
        },
        SessionState::Loading | SessionState::Anonymous => AccessDecision::SignInRequired,
    }
}

/// Checks for an admin profile. Non-admin identities get a redirect
/// decision, never a partial view.
pub fn check_admin(state: &SessionState) -> AccessDecision {
    match check_identity(state) {
        AccessDecision::Granted { identity, profile } => {
            if profile.as_ref().is_some_and(profile::Model::is_admin) {
                AccessDecision::Granted { identity, profile }
            } else {
                AccessDecision::Redirect {
                    to: "/dashboard",
                    reason: "You don't have permission to access this page",
                }
            }
        }
        other => other,
    }
}

impl AccessDecision {
    fn into_result(self) -> Result<(Identity, Option<profile::Model>), ApiError> {
        match self {
            AccessDecision::Granted { identity, profile } => Ok((identity, profile)),
            AccessDecision::SignInRequired => Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                "SIGN_IN_REQUIRED",
                "Please sign in to view this page",
            )),
            AccessDecision::Redirect { to, reason } => Err(ApiError::new(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                reason,
            )
            .with_details(serde_json::json!({ "redirect_to": to }))),
        }
    }
}

/// Extractor yielding the current session snapshot; never rejects.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionState);

impl<S> FromRequestParts<S> for CurrentSession
where
    SessionManager: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionManager::from_ref(state);
        Ok(CurrentSession(sessions.snapshot()))
    }
}

/// Extractor for identity-scoped endpoints (tasks). Rejects anonymous
/// callers with a sign-in prompt.
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequireIdentity
where
    SessionManager: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionManager::from_ref(state);
        let (identity, _profile) = check_identity(&sessions.snapshot()).into_result()?;
        Ok(RequireIdentity(identity))
    }
}

/// Extractor for the admin surface. The snapshot is re-read on every
/// request, so a sign-out observed through the session channel makes the
/// very next check fail.
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    pub identity: Identity,
    pub profile: profile::Model,
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    SessionManager: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionManager::from_ref(state);
        let (identity, profile) = check_admin(&sessions.snapshot()).into_result()?;
        // check_admin only grants when an admin profile is present.
        let profile = profile.ok_or_else(|| {
            ApiError::new(StatusCode::FORBIDDEN, "FORBIDDEN", "Profile unavailable")
        })?;
        Ok(RequireAdmin { identity, profile })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
        }
    }

    fn profile(role: &str) -> profile::Model {
        let now = Utc::now().into();
        profile::Model {
            id: Uuid::new_v4(),
            role: role.to_string(),
            full_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_anonymous_gets_sign_in_prompt() {
        assert_eq!(
            check_identity(&SessionState::Anonymous),
            AccessDecision::SignInRequired
        );
        assert_eq!(
            check_identity(&SessionState::Loading),
            AccessDecision::SignInRequired
        );
    }

    #[test]
    fn test_authenticated_identity_is_granted() {
        let state = SessionState::Authenticated {
            identity: identity(),
            profile: None,
        };
        assert!(matches!(
            check_identity(&state),
            AccessDecision::Granted { .. }
        ));
    }

    #[test]
    fn test_non_admin_is_redirected_not_partially_shown() {
        let state = SessionState::Authenticated {
            identity: identity(),
            profile: Some(profile("user")),
        };
        assert!(matches!(
            check_admin(&state),
            AccessDecision::Redirect { .. }
        ));

        // Missing profile is treated the same as a non-admin one.
        let no_profile = SessionState::Authenticated {
            identity: identity(),
            profile: None,
        };
        assert!(matches!(
            check_admin(&no_profile),
            AccessDecision::Redirect { .. }
        ));
    }

    #[test]
    fn test_admin_is_granted() {
        let state = SessionState::Authenticated {
            identity: identity(),
            profile: Some(profile("admin")),
        };
        assert!(matches!(check_admin(&state), AccessDecision::Granted { .. }));
    }

    #[test]
    fn test_sign_out_invalidates_next_check() {
        let admin = SessionState::Authenticated {
            identity: identity(),
            profile: Some(profile("admin")),
        };
        assert!(matches!(check_admin(&admin), AccessDecision::Granted { .. }));

        // After sign-out the snapshot is Anonymous; the next check fails.
        assert_eq!(
            check_admin(&SessionState::Anonymous),
            AccessDecision::SignInRequired
        );
    }
}
