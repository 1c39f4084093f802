use std::str::FromStr;

use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, SqlitePool};
use tracing::info;

use crate::bot::db::tags::TAGS_TABLE;

pub mod tags;

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;

    initialize_database(&pool).await?;
    info!("Connected to {database_url}");
    Ok(pool)
}

pub async fn initialize_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(TAGS_TABLE).execute(pool).await?;
    Ok(())
}
