pub mod event_volunteers_repo;
pub mod events_repo;
pub mod volunteers_repo;

#[cfg(test)]
pub mod fixtures;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePoolOptions::new().connect_with(options).await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Fresh in-memory database with the schema applied. A single connection that
/// never expires, since every SQLite `:memory:` connection is its own database.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::migrate::MigrateError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Lowercased form stored next to a searchable column. Search patterns are
/// lowercased the same way, so matching does not depend on SQLite's
/// ASCII-only case folding.
pub fn search_key(raw: &str) -> String {
    raw.to_lowercase()
}

/// Escapes `%`, `_` and `\` so user input can be embedded in a
/// `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
