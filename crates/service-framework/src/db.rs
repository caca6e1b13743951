//! # Database
//!
//! Each service owns one SQLite database reached through a `sqlx` pool. The pool is
//! the only shared handle a service keeps; it is cloned into request state.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Opens (creating if needed) the database at `database_url`.
///
/// In-memory databases live as long as their connection, so they get a single
/// connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;
    info!(database_url, "Database connected");
    Ok(pool)
}

/// Runs `CREATE ... IF NOT EXISTS` statements one by one.
pub async fn apply_schema(pool: &SqlitePool, statements: &[&str]) -> Result<(), sqlx::Error> {
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// True when `e` is a UNIQUE constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_schema_survives_between_queries() {
        let pool = connect("sqlite::memory:").await.unwrap();
        apply_schema(
            &pool,
            &["CREATE TABLE IF NOT EXISTS notes (id INTEGER PRIMARY KEY, body TEXT NOT NULL UNIQUE)"],
        )
        .await
        .unwrap();

        sqlx::query("INSERT INTO notes (body) VALUES ('a')")
            .execute(&pool)
            .await
            .unwrap();
        let err = sqlx::query("INSERT INTO notes (body) VALUES ('a')")
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
