//! services/api/src/bin/reset_db.rs
//!
//! Empties the users, auth session and document collections of the configured
//! database. Intended for local development.

use api_lib::{adapters::DbAdapter, config::Config, error::ApiError};
use chartgenius_core::DatabaseService;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| ApiError::Internal("DATABASE_URL is required".to_string()))?;
    let db_pool = PgPoolOptions::new().max_connections(1).connect(url).await?;
    let db = DbAdapter::new(db_pool);
    db.run_migrations().await?;

    db.clear_all().await?;
    info!("All collections cleared.");
    Ok(())
}
