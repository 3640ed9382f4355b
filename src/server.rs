//! # Server Configuration
//!
//! Router assembly and server startup for the CRM API.

use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRef, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::handlers;
use crate::session::{DbProfileSource, HttpAuthProvider, SessionManager};
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub sessions: SessionManager,
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.config)
    }
}

/// Makes a per-request trace id available through task-local storage.
async fn trace_context_middleware(request: Request, next: Next) -> Response {
    let context = TraceContext {
        trace_id: Uuid::new_v4().to_string(),
    };
    telemetry::with_trace_context(context, next.run(request)).await
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/companies",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/companies/{id}",
            get(handlers::companies::get_company)
                .patch(handlers::companies::update_company)
                .delete(handlers::companies::delete_company),
        )
        .route(
            "/industries",
            get(handlers::industries::list_industries).post(handlers::industries::create_industry),
        )
        .route(
            "/industries/{id}",
            get(handlers::industries::get_industry)
                .patch(handlers::industries::update_industry)
                .delete(handlers::industries::delete_industry),
        )
        .route(
            "/people",
            get(handlers::people::list_people).post(handlers::people::create_person),
        )
        .route(
            "/people/{id}",
            get(handlers::people::get_person)
                .patch(handlers::people::update_person)
                .delete(handlers::people::delete_person),
        )
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::tasks::get_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/session", get(handlers::session::current_session))
        .route("/session/sign-in", post(handlers::session::sign_in))
        .route("/session/sign-up", post(handlers::session::sign_up))
        .route("/session/sign-out", post(handlers::session::sign_out))
        .route("/admin/profiles", get(handlers::admin::list_profiles))
        .route("/admin/profiles/{id}", axum::routing::patch(handlers::admin::update_role));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let provider = Arc::new(HttpAuthProvider::from_config(&config));
    let profiles = Arc::new(DbProfileSource::new(db.clone()));
    let sessions = SessionManager::new(provider, profiles);
    sessions.start();

    let addr = config.bind_addr()?;
    let state = AppState {
        db,
        config: Arc::new(config),
        sessions,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::companies::list_companies,
        crate::handlers::companies::get_company,
        crate::handlers::companies::create_company,
        crate::handlers::companies::update_company,
        crate::handlers::companies::delete_company,
        crate::handlers::industries::list_industries,
        crate::handlers::industries::get_industry,
        crate::handlers::industries::create_industry,
        crate::handlers::industries::update_industry,
        crate::handlers::industries::delete_industry,
        crate::handlers::people::list_people,
        crate::handlers::people::get_person,
        crate::handlers::people::create_person,
        crate::handlers::people::update_person,
        crate::handlers::people::delete_person,
        crate::handlers::tasks::list_tasks,
        crate::handlers::tasks::get_task,
        crate::handlers::tasks::create_task,
        crate::handlers::tasks::update_task,
        crate::handlers::tasks::delete_task,
        crate::handlers::dashboard::get_dashboard,
        crate::handlers::session::current_session,
        crate::handlers::session::sign_in,
        crate::handlers::session::sign_up,
        crate::handlers::session::sign_out,
        crate::handlers::admin::list_profiles,
        crate::handlers::admin::update_role,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::EntityRef,
            crate::models::PersonWithCompany,
            crate::models::TaskWithRelations,
            crate::models::company::Model,
            crate::models::industry::Model,
            crate::models::person::Model,
            crate::models::profile::Model,
            crate::models::task::Model,
            crate::error::ApiError,
            crate::query::dashboard::CategoryCount,
            crate::handlers::dashboard::DashboardSummary,
            crate::session::Identity,
            crate::handlers::session::SessionResponse,
            crate::handlers::session::ProfileInfo,
            crate::handlers::session::SignInRequest,
            crate::handlers::session::SignUpRequest,
            crate::handlers::admin::UpdateRoleRequest,
            crate::repositories::CreateCompanyRequest,
            crate::repositories::UpdateCompanyRequest,
            crate::repositories::CreateIndustryRequest,
            crate::repositories::UpdateIndustryRequest,
            crate::repositories::CreatePersonRequest,
            crate::repositories::UpdatePersonRequest,
            crate::repositories::CreateTaskRequest,
            crate::repositories::UpdateTaskRequest,
        )
    ),
    info(
        title = "CRM API",
        description = "Data service for the CRM application: companies, industries, people, tasks, dashboard aggregates, and session management",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
