//! Auth provider backed by a hosted GoTrue-compatible REST API.
//!
//! Talks to the provider's password-grant endpoints and keeps the current
//! access token for sign-out and session lookup. Successful operations are
//! also published on the notification channel so the session manager's
//! event loop observes them like any provider-pushed change.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AuthError;
use crate::session::{AuthProvider, Identity, SessionEvent};

/// Auth provider speaking the hosted provider's REST protocol.
pub struct HttpAuthProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    access_token: RwLock<Option<String>>,
    events: broadcast::Sender<SessionEvent>,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<SignUpMetadata<'a>>,
}

#[derive(Debug, Serialize)]
struct SignUpMetadata<'a> {
    full_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// Sign-up responses carry a session when email confirmation is disabled,
/// and only the user otherwise.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    user: Option<AuthUser>,
    id: Option<Uuid>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl HttpAuthProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            access_token: RwLock::new(None),
            events,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.auth_base_url.clone(), config.auth_api_key.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, self.endpoint(path));
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key);
        }
        builder
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine; the manager may not be running in tests.
        let _ = self.events.send(event);
    }

    async fn remember_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    /// Turns a non-success response into the appropriate [`AuthError`].
    async fn rejection(response: reqwest::Response) -> AuthError {
        let status = response.status();
        let message = match response.json::<ProviderErrorBody>().await {
            Ok(body) => body
                .error_description
                .or(body.msg)
                .or(body.message)
                .unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        };

        if status.is_client_error() {
            AuthError::Rejected(message)
        } else {
            AuthError::Transport(message)
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn current_session(&self) -> Result<Option<Identity>, AuthError> {
        let Some(token) = self.access_token.read().await.clone() else {
            return Ok(None);
        };

        let response = self
            .request(reqwest::Method::GET, "/auth/v1/user")
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Stored token no longer valid.
            self.remember_token(None).await;
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|err| AuthError::Malformed(err.to_string()))?;

        Ok(Some(Identity {
            user_id: user.id,
            email: user.email,
        }))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/auth/v1/token?grant_type=password")
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Malformed(err.to_string()))?;

        self.remember_token(Some(token.access_token)).await;
        let identity = Identity {
            user_id: token.user.id,
            email: token.user.email,
        };
        self.publish(SessionEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Identity, AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/auth/v1/signup")
            .json(&SignUpRequest {
                email,
                password,
                data: full_name.map(|full_name| SignUpMetadata { full_name }),
            })
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: SignUpResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Malformed(err.to_string()))?;

        self.remember_token(body.access_token).await;

        let identity = match (body.user, body.id, body.email) {
            (Some(user), _, _) => Identity {
                user_id: user.id,
                email: user.email,
            },
            (None, Some(id), Some(email)) => Identity { user_id: id, email },
            _ => {
                return Err(AuthError::Malformed(
                    "sign-up response missing user".to_string(),
                ));
            }
        };

        self.publish(SessionEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self.access_token.read().await.clone();

        if let Some(token) = token {
            let response = self
                .request(reqwest::Method::POST, "/auth/v1/logout")
                .bearer_auth(&token)
                .send()
                .await
                .map_err(|err| AuthError::Transport(err.to_string()))?;

            // 401 means the token was already dead; treat it as signed out.
            if !response.status().is_success()
                && response.status() != reqwest::StatusCode::UNAUTHORIZED
            {
                return Err(Self::rejection(response).await);
            }
        }

        self.remember_token(None).await;
        self.publish(SessionEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
