//! Synchronous SQLite storage implementation

use chrono::Utc;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use storyfeed_core::{AuthSession, LoadType, RemoteKey, StoryItem};

use crate::error::{Result, StoreError};
use crate::migrations;
use crate::types::StoreStats;

/// Blocking storage over one SQLite connection.
///
/// Exposed to the rest of the workspace only through the async facade in
/// [`crate::store`]; unit tests in this crate exercise it directly.
#[derive(Debug)]
pub(crate) struct StoreInner {
    conn: Mutex<Connection>,
}

fn log_row_error<T>(result: rusqlite::Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("Row read error: {}", e);
            None
        },
    }
}

fn story_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoryItem> {
    let created_at_str: String = row.get(4)?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
        .with_timezone(&Utc);

    Ok(StoryItem {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        photo_url: row.get(3)?,
        created_at,
        lat: row.get(5)?,
        lon: row.get(6)?,
    })
}

impl StoreInner {
    pub(crate) fn new(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        migrations::run_migrations(&conn)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Merge one fetched page into the cache in a single transaction.
    ///
    /// `Refresh` clears both tables first (full invalidation). Every item
    /// gets a remote-key row with the shared (`prev_key`, `next_key`) pair;
    /// id collisions replace the existing row. Positions are assigned so
    /// iteration order equals logical paging order: refresh restarts at 0,
    /// append continues above the current maximum, prepend allocates below
    /// the current minimum.
    pub(crate) fn merge_page(
        &self,
        load_type: LoadType,
        items: &[StoryItem],
        prev_key: Option<u32>,
        next_key: Option<u32>,
    ) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        if load_type == LoadType::Refresh {
            tx.execute("DELETE FROM remote_keys", [])?;
            tx.execute("DELETE FROM stories", [])?;
        }

        let start: i64 = match load_type {
            LoadType::Refresh => 0,
            LoadType::Append => {
                let max: i64 =
                    tx.query_row("SELECT COALESCE(MAX(position), -1) FROM stories", [], |r| {
                        r.get(0)
                    })?;
                max + 1
            },
            LoadType::Prepend => {
                let min: i64 =
                    tx.query_row("SELECT COALESCE(MIN(position), 0) FROM stories", [], |r| {
                        r.get(0)
                    })?;
                min - items.len() as i64
            },
        };

        {
            let mut key_stmt = tx.prepare(
                "INSERT OR REPLACE INTO remote_keys (id, prev_key, next_key) VALUES (?1, ?2, ?3)",
            )?;
            let mut story_stmt = tx.prepare(
                r#"INSERT OR REPLACE INTO stories
                   (position, id, name, description, photo_url, created_at, lat, lon)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            )?;
            for (i, item) in items.iter().enumerate() {
                key_stmt.execute(params![item.id, prev_key, next_key])?;
                story_stmt.execute(params![
                    start + i as i64,
                    item.id,
                    item.name,
                    item.description,
                    item.photo_url,
                    item.created_at.with_timezone(&Utc).to_rfc3339(),
                    item.lat,
                    item.lon,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    pub(crate) fn remote_key(&self, id: &str) -> Result<Option<RemoteKey>> {
        let conn = self.lock_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, prev_key, next_key FROM remote_keys WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(RemoteKey {
                id: row.get(0)?,
                prev_key: row.get(1)?,
                next_key: row.get(2)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Ordered window of cached stories.
    pub(crate) fn stories(&self, offset: u64, limit: u64) -> Result<Vec<StoryItem>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT id, name, description, photo_url, created_at, lat, lon
               FROM stories ORDER BY position LIMIT ?1 OFFSET ?2"#,
        )?;
        let results = stmt
            .query_map(params![limit as i64, offset as i64], story_from_row)?
            .filter_map(log_row_error)
            .collect();
        Ok(results)
    }

    pub(crate) fn story_count(&self) -> Result<u64> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM stories", [], |r| r.get(0))?;
        Ok(count as u64)
    }

    /// Bulk delete of both paging tables (cache invalidation / logout).
    pub(crate) fn clear_stories(&self) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM remote_keys", [])?;
        tx.execute("DELETE FROM stories", [])?;
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn save_auth(&self, session: &AuthSession) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"INSERT OR REPLACE INTO auth_session
               (slot, user_id, name, email, token, logged_in_at)
               VALUES (0, ?1, ?2, ?3, ?4, ?5)"#,
            params![
                session.user_id,
                session.name,
                session.email,
                session.token,
                session.logged_in_at.with_timezone(&Utc).to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub(crate) fn auth(&self) -> Result<Option<AuthSession>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, name, email, token, logged_in_at FROM auth_session WHERE slot = 0",
        )?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            let logged_in_at_str: String = row.get(4)?;
            let logged_in_at = chrono::DateTime::parse_from_rfc3339(&logged_in_at_str)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
                .with_timezone(&Utc);
            Ok(Some(AuthSession {
                user_id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                token: row.get(3)?,
                logged_in_at,
            }))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn clear_auth(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM auth_session", [])?;
        Ok(())
    }

    pub(crate) fn stats(&self) -> Result<StoreStats> {
        let conn = self.lock_conn()?;
        let story_count: i64 = conn.query_row("SELECT COUNT(*) FROM stories", [], |r| r.get(0))?;
        let remote_key_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM remote_keys", [], |r| r.get(0))?;
        let session_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM auth_session", [], |r| r.get(0))?;
        Ok(StoreStats {
            story_count: story_count as u64,
            remote_key_count: remote_key_count as u64,
            has_session: session_count > 0,
        })
    }
}
