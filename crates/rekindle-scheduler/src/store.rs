//! SQLite job table — one row per contact registration, keyed
//! `schedule_<contact_id>`. Survives process restarts; the runner rearms
//! from it at startup.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use rekindle_core::{RekindleError, Result};

/// One persisted registration.
#[derive(Debug, Clone)]
pub struct JobRow {
    pub key: String,
    /// Tagged payload JSON, decoded at fire time.
    pub payload: Value,
    pub interval: Duration,
    pub next_fire_at: DateTime<Utc>,
}

pub struct JobTable {
    conn: Connection,
}

impl JobTable {
    /// Open or create the job table at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)
            .map_err(|e| RekindleError::Store(format!("open {}: {e}", path.display())))?;
        Self::init(conn)
    }

    /// In-memory table for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RekindleError::Store(format!("open in-memory: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schedule_jobs (
                key           TEXT PRIMARY KEY,
                payload       TEXT NOT NULL,
                interval_secs INTEGER NOT NULL,
                next_fire_at  TEXT NOT NULL
            );",
        )
        .map_err(|e| RekindleError::Store(format!("migrate: {e}")))?;
        Ok(Self { conn })
    }

    /// Insert or replace the row for `key`. The primary key makes the
    /// replacement atomic per key.
    pub fn upsert(
        &self,
        key: &str,
        payload: &Value,
        interval: Duration,
        next_fire_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO schedule_jobs (key, payload, interval_secs, next_fire_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    key,
                    payload.to_string(),
                    interval.as_secs() as i64,
                    next_fire_at.to_rfc3339(),
                ],
            )
            .map_err(|e| RekindleError::Store(format!("upsert {key}: {e}")))?;
        Ok(())
    }

    /// Delete the row for `key`. Deleting an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM schedule_jobs WHERE key = ?1", [key])
            .map_err(|e| RekindleError::Store(format!("remove {key}: {e}")))?;
        Ok(())
    }

    /// Record the next deadline after a firing.
    pub fn advance(&self, key: &str, next_fire_at: DateTime<Utc>) -> Result<()> {
        self.conn
            .execute(
                "UPDATE schedule_jobs SET next_fire_at = ?2 WHERE key = ?1",
                rusqlite::params![key, next_fire_at.to_rfc3339()],
            )
            .map_err(|e| RekindleError::Store(format!("advance {key}: {e}")))?;
        Ok(())
    }

    /// Load every persisted registration.
    pub fn load(&self) -> Result<Vec<JobRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, payload, interval_secs, next_fire_at FROM schedule_jobs")
            .map_err(|e| RekindleError::Store(format!("prepare load: {e}")))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| RekindleError::Store(format!("load: {e}")))?;

        let mut out = Vec::new();
        for row in rows {
            let (key, payload, interval_secs, next_fire_at) =
                row.map_err(|e| RekindleError::Store(format!("load row: {e}")))?;
            let payload = serde_json::from_str(&payload)
                .map_err(|e| RekindleError::Store(format!("payload for {key}: {e}")))?;
            let next_fire_at = DateTime::parse_from_rfc3339(&next_fire_at)
                .map_err(|e| RekindleError::Store(format!("next_fire_at for {key}: {e}")))?
                .with_timezone(&Utc);
            out.push(JobRow {
                key,
                payload,
                interval: Duration::from_secs(interval_secs.max(0) as u64),
                next_fire_at,
            });
        }
        Ok(out)
    }

    /// Number of persisted registrations.
    pub fn count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM schedule_jobs", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n.max(0) as usize)
            .map_err(|e| RekindleError::Store(format!("count: {e}")))
    }
}
