use crate::database::DbError;
use app_state::DatabaseSettings;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;
use tracing::info;

/// Connect to the database and bring the schema up to date.
///
/// # Errors
///
/// * `SqlitePool::connect` can return an error if the database cannot be opened.
/// * `sqlx::migrate` can return an error if migrations fail.
pub async fn get_db_pool(db_settings: &DatabaseSettings) -> color_eyre::Result<SqlitePool> {
    info!("Connecting to database.");
    let pool = SqlitePoolOptions::new()
        .max_connections(db_settings.max_connections)
        .acquire_timeout(Duration::from_secs(db_settings.acquire_timeout))
        .test_before_acquire(true)
        .connect(&db_settings.url)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    info!("Running database migrations.");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
