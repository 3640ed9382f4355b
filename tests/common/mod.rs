//! Shared helpers for integration tests: an in-memory database, a mock
//! auth provider, and app assembly.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use tokio::sync::broadcast;
use uuid::Uuid;

use crm::config::AppConfig;
use crm::error::AuthError;
use crm::migration::{Migrator, MigratorTrait};
use crm::models::profile;
use crm::server::{AppState, create_app};
use crm::session::{
    AuthProvider, DbProfileSource, Identity, SessionEvent, SessionManager, SessionState,
};

/// Auth provider stub: signs anyone in, tracks the current session.
pub struct MockProvider {
    session: Mutex<Option<Identity>>,
    pub sign_out_fails: bool,
    events: broadcast::Sender<SessionEvent>,
}

impl MockProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            session: Mutex::new(None),
            sign_out_fails: false,
            events,
        }
    }

    pub fn push(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl AuthProvider for MockProvider {
    async fn current_session(&self) -> Result<Option<Identity>, AuthError> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        let mut session = self.session.lock().unwrap();
        // Same email keeps the same user id across repeated sign-ins.
        if let Some(existing) = session.as_ref().filter(|i| i.email == email) {
            return Ok(existing.clone());
        }
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
        };
        *session = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _full_name: Option<&str>,
    ) -> Result<Identity, AuthError> {
        self.sign_in(email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.sign_out_fails {
            return Err(AuthError::Transport("connection reset".to_string()));
        }
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Builds the app with an in-memory database and a mock auth provider.
pub async fn test_app() -> (Router, AppState, Arc<MockProvider>) {
    let db = setup_test_db().await;
    let provider = Arc::new(MockProvider::new());
    let sessions = SessionManager::new(
        Arc::clone(&provider) as Arc<dyn AuthProvider>,
        Arc::new(DbProfileSource::new(db.clone())),
    );

    let state = AppState {
        db,
        config: Arc::new(AppConfig::default()),
        sessions,
    };
    (create_app(state.clone()), state, provider)
}

/// Inserts a profile row so the session's best-effort profile fetch finds
/// a role.
pub async fn insert_profile(db: &DatabaseConnection, user_id: Uuid, role: &str) {
    let now = Utc::now();
    profile::ActiveModel {
        id: Set(user_id),
        role: Set(role.to_string()),
        full_name: Set(Some("Test User".to_string())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .unwrap();
}

/// Signs in through the session manager and waits for the profile fetch,
/// returning the identity. Inserts a profile row with `role` first.
pub async fn sign_in_with_role(state: &AppState, role: &str) -> Identity {
    let snapshot = state
        .sessions
        .sign_in("tester@example.com", "secret1")
        .await
        .unwrap();
    let identity = snapshot.identity().unwrap().clone();

    insert_profile(&state.db, identity.user_id, role).await;

    // Re-run the sign-in so the profile fetch sees the row.
    let snapshot = state
        .sessions
        .sign_in("tester@example.com", "secret1")
        .await
        .unwrap();
    let identity = snapshot.identity().unwrap().clone();
    match state.sessions.snapshot() {
        SessionState::Authenticated { .. } => {}
        other => panic!("expected authenticated session, got {other:?}"),
    }
    identity
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
