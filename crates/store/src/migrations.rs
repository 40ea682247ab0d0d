//! Database migrations

use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 2;

pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    let current_version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!(
        "Database schema version: {} (target: {})",
        current_version,
        SCHEMA_VERSION
    );

    if current_version < 1 {
        tracing::info!("Running migration v1: story cache tables");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS stories (
                position INTEGER PRIMARY KEY,
                id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                photo_url TEXT NOT NULL,
                created_at TEXT NOT NULL,
                lat REAL,
                lon REAL
            );

            CREATE TABLE IF NOT EXISTS remote_keys (
                id TEXT PRIMARY KEY,
                prev_key INTEGER,
                next_key INTEGER
            );
            "#,
        )?;
    }

    if current_version < 2 {
        tracing::info!("Running migration v2: auth_session table");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS auth_session (
                slot INTEGER PRIMARY KEY CHECK (slot = 0),
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                token TEXT NOT NULL,
                logged_in_at TEXT NOT NULL
            );
            "#,
        )?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tracing::info!("Database schema up to date (version {})", SCHEMA_VERSION);

    Ok(())
}
