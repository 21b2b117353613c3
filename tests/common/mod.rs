use axum::Router;
use sea_orm::{Database, DatabaseConnection, DbErr};
use std::sync::Arc;

use bluecarbon_backend::routes;
use bluecarbon_backend::services::{auth::AuthService, object_storage::StorageService};
use bluecarbon_backend::{AppConfig, AppState};

/// Build the full application router over a (mock) database connection.
/// Auth and storage point at unreachable test endpoints; paths that call
/// out to them are covered at the service layer instead.
pub fn build_test_app(db: DatabaseConnection) -> Router {
    let state = AppState {
        db: Arc::new(db),
        auth: AuthService::new(
            "http://localhost:54321".to_string(),
            "test_api_key".to_string(),
        ),
        storage: StorageService::new(
            "http://localhost:54321".to_string(),
            "test_api_key".to_string(),
            "company-docs".to_string(),
        ),
        config: AppConfig::default(),
    };

    routes::app(state)
}

/// Live Postgres connection for ignored end-to-end tests.
/// Uses TEST_DATABASE_URL or falls back to a local default.
#[allow(dead_code)]
pub async fn connect_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| {
        "postgresql://bluecarbon_user@localhost:5432/bluecarbon_test".to_string()
    });

    Database::connect(&database_url).await
}
