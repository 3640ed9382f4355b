//! # Session and Identity
//!
//! Process-wide session state machine kept in sync with the external auth
//! provider. The state starts as `Loading`, moves to `Authenticated` or
//! `Anonymous` once the initial session lookup resolves, and is re-driven by
//! change notifications pushed by the provider. Both paths converge on the
//! same state shape; whichever event arrives later wins.
//!
//! The current state lives in a `tokio::sync::watch` channel: handlers read
//! a snapshot, and anything that needs to react to sign-in/sign-out can
//! subscribe to the receiver side.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AuthError, RepositoryError};
use crate::models::{Profile, profile};

pub mod http;

pub use http::HttpAuthProvider;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// An authenticated identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Identity {
    /// The provider's user id; also the profile primary key.
    pub user_id: Uuid,
    pub email: String,
}

/// The session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Initial state until the first session lookup resolves.
    Loading,
    Anonymous,
    Authenticated {
        identity: Identity,
        /// Role and display name, fetched best-effort after sign-in.
        profile: Option<profile::Model>,
    },
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&profile::Model> {
        match self {
            SessionState::Authenticated { profile, .. } => profile.as_ref(),
            _ => None,
        }
    }

    /// Whether the session carries an admin profile. Absent profiles are
    /// never admin.
    pub fn is_admin(&self) -> bool {
        self.profile().is_some_and(profile::Model::is_admin)
    }
}

/// A change notification pushed by the auth provider.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn(Identity),
    TokenRefreshed(Identity),
    SignedOut,
}

/// The external auth provider surface the session manager drives.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Looks up any existing session, e.g. from a persisted refresh token.
    async fn current_session(&self) -> Result<Option<Identity>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribes to asynchronous change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

/// Best-effort profile lookup performed after an identity becomes known.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, user_id: Uuid) -> Result<Option<profile::Model>, RepositoryError>;
}

/// Profile lookup backed by the profiles table.
pub struct DbProfileSource {
    db: DatabaseConnection,
}

impl DbProfileSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileSource for DbProfileSource {
    async fn fetch(&self, user_id: Uuid) -> Result<Option<profile::Model>, RepositoryError> {
        Profile::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

struct SessionManagerInner {
    provider: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileSource>,
    tx: watch::Sender<SessionState>,
}

/// Holds the process-wide session state and drives its transitions.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

impl SessionManager {
    /// Creates a manager in the `Loading` state. Call [`Self::start`] to
    /// issue the initial lookup and begin consuming provider notifications.
    pub fn new(provider: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfileSource>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::Loading);
        Self {
            inner: Arc::new(SessionManagerInner {
                provider,
                profiles,
                tx,
            }),
        }
    }

    /// Spawns the initial session lookup and the notification loop. The two
    /// run independently; both funnel into [`Self::apply_identity`], so the
    /// later result wins regardless of arrival order.
    pub fn start(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            match manager.inner.provider.current_session().await {
                Ok(identity) => manager.apply_identity(identity).await,
                Err(err) => {
                    tracing::warn!(error = %err, "Initial session lookup failed");
                    manager.inner.tx.send_replace(SessionState::Anonymous);
                }
            }
        });

        let manager = self.clone();
        let mut events = self.inner.provider.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::SignedIn(identity))
                    | Ok(SessionEvent::TokenRefreshed(identity)) => {
                        manager.apply_identity(Some(identity)).await;
                    }
                    Ok(SessionEvent::SignedOut) => {
                        manager.inner.tx.send_replace(SessionState::Anonymous);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session notification stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Returns the current state.
    pub fn snapshot(&self) -> SessionState {
        self.inner.tx.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.tx.subscribe()
    }

    /// Signs in with email and password. The email is validated before any
    /// provider call.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionState, AuthError> {
        validate_credentials(email, password)?;
        let identity = self.inner.provider.sign_in(email, password).await?;
        self.apply_identity(Some(identity)).await;
        Ok(self.snapshot())
    }

    /// Registers a new account and signs it in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SessionState, AuthError> {
        validate_credentials(email, password)?;
        let identity = self
            .inner
            .provider
            .sign_up(email, password, full_name)
            .await?;
        self.apply_identity(Some(identity)).await;
        Ok(self.snapshot())
    }

    /// Signs out. The state only moves to `Anonymous` once the provider
    /// confirms; on failure the previous state is left intact.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.provider.sign_out().await?;
        self.inner.tx.send_replace(SessionState::Anonymous);
        Ok(())
    }

    /// Converges on the state implied by `identity`, then runs the
    /// best-effort profile fetch. A failed fetch is logged and leaves the
    /// `Authenticated` state (with no profile) in place.
    async fn apply_identity(&self, identity: Option<Identity>) {
        let Some(identity) = identity else {
            self.inner.tx.send_replace(SessionState::Anonymous);
            return;
        };

        self.inner.tx.send_replace(SessionState::Authenticated {
            identity: identity.clone(),
            profile: None,
        });

        match self.inner.profiles.fetch(identity.user_id).await {
            Ok(profile) => {
                // Attach only if the session still belongs to the same user.
                self.inner.tx.send_if_modified(|state| match state {
                    SessionState::Authenticated {
                        identity: current, ..
                    } if current.user_id == identity.user_id => {
                        *state = SessionState::Authenticated { identity, profile };
                        true
                    }
                    _ => false,
                });
            }
            Err(err) => {
                tracing::warn!(
                    user_id = %identity.user_id,
                    error = %err,
                    "Profile fetch failed; session stays authenticated without a profile"
                );
            }
        }
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(AuthError::InvalidEmail);
    }
    if password.len() < 6 {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}
