//! Deskrail API composition root.

#![forbid(unsafe_code)]

mod api_router;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use deskrail_application::{
    DirectoryAdminService, DirectoryRepository, IdentityService, SecurityAdminService,
    TenantScopeService, TicketService, UserAdminService,
};
use deskrail_core::AppError;
use deskrail_infrastructure::{
    Argon2CredentialVerifier, CachedDirectoryRepository, PostgresDirectoryRepository,
    PostgresRoleRepository, PostgresTicketRepository, PostgresUserRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let directory_repository: Arc<dyn DirectoryRepository> = Arc::new(
        CachedDirectoryRepository::new(Arc::new(PostgresDirectoryRepository::new(pool.clone()))),
    );
    let role_repository = Arc::new(PostgresRoleRepository::new(pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let ticket_repository = Arc::new(PostgresTicketRepository::new(pool.clone()));
    let credential_verifier = Arc::new(Argon2CredentialVerifier::new(pool.clone()));

    let tenant_scope_service = TenantScopeService::new(directory_repository.clone());
    let identity_service = IdentityService::new(
        user_repository.clone(),
        role_repository.clone(),
        credential_verifier,
    );
    let directory_admin_service = DirectoryAdminService::new(
        directory_repository.clone(),
        tenant_scope_service.clone(),
    );
    let security_admin_service =
        SecurityAdminService::new(role_repository, directory_repository.clone());
    let user_admin_service = UserAdminService::new(
        user_repository.clone(),
        directory_repository.clone(),
        tenant_scope_service.clone(),
    );
    let ticket_service = TicketService::new(
        ticket_repository,
        directory_repository,
        tenant_scope_service.clone(),
    );

    let app_state = AppState {
        identity_service,
        tenant_scope_service,
        directory_admin_service,
        security_admin_service,
        user_admin_service,
        ticket_service,
        postgres_pool: pool,
        frontend_url: frontend_url.clone(),
    };

    let app = api_router::build_router(app_state, &frontend_url, session_layer)?;

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "deskrail-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
