use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::auth::JwtConfig;
use crate::config::Settings;
use crate::repo::{PgStore, Store};
use crate::storage::Blobs;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers and extractors can pull out just the part
/// they need (`State<Store>`, `State<JwtConfig>`).
#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub blobs: Blobs,
    pub jwt: JwtConfig,
    pub settings: Settings,
}

impl AppState {
    /// In-memory store and blob store. Used by tests and by the server when
    /// the `postgres`/`s3` feature flags are off.
    pub fn in_memory(jwt: JwtConfig, settings: Settings) -> Self {
        Self {
            store: Store::memory(),
            blobs: Blobs::memory(),
            jwt,
            settings,
        }
    }
}

/// Create a new database connection pool from environment variables.
/// Uses `connect_lazy` so no connections open until the first query.
pub fn create_pool() -> Result<Pool<Postgres>, String> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(&database_url)
        .map_err(|e| format!("Failed to create database pool: {e}"))
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), String> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| format!("Failed to run database migrations: {e}"))
}

/// Connect, migrate and wrap the pool as a [`Store`].
pub async fn postgres_store() -> Result<Store, String> {
    let pool = create_pool()?;
    run_migrations(&pool).await?;
    Ok(Store::Postgres(PgStore::new(pool)))
}
