//! Postgres pool setup and schema migrations.
//!
//! SYSTEM CONTEXT
//! ==============
//! Accounts, the menu catalog, and conversation sessions all live in one
//! Postgres database. Startup builds the shared pool here and applies the
//! embedded migrations (which also seed the catalog) before serving traffic.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Pool size from `DB_MAX_CONNECTIONS`, falling back to the default on absence
/// or parse failure.
pub(crate) fn db_max_connections() -> u32 {
    crate::config::env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)
}

/// Connect to `PostgreSQL` and run pending migrations.
///
/// # Errors
///
/// Returns an error if the connection or any migration fails.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(db_max_connections())
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
