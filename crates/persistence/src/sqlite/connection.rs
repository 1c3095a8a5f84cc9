//! Session database handle and schema migrations

use ctbridge_core::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// Schema steps, applied in order; `PRAGMA user_version` records how many ran
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        shop TEXT NOT NULL,
        state TEXT NOT NULL DEFAULT '',
        is_online INTEGER NOT NULL DEFAULT 0,
        scope TEXT,
        expires TIMESTAMP,
        access_token_encrypted BLOB,
        access_token_iv BLOB,
        user_id INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sessions_shop ON sessions (shop)",
];

/// Pooled SQLite connection holding the `sessions` table
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and bring its schema up to date
    pub async fn connect(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::DatabaseError(e.to_string()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

        Self::migrated(pool).await
    }

    /// Private in-memory database; a single connection so every query sees it
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

        Self::migrated(pool).await
    }

    async fn migrated(pool: SqlitePool) -> Result<Self> {
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<()> {
        let applied = self.schema_version().await?;

        for (index, step) in MIGRATIONS.iter().enumerate().skip(applied) {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| Error::DatabaseError(e.to_string()))?;

            sqlx::query(step)
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::DatabaseError(format!("migration {} failed: {}", index + 1, e)))?;
            // PRAGMA does not take bind parameters
            sqlx::query(&format!("PRAGMA user_version = {}", index + 1))
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::DatabaseError(e.to_string()))?;

            tx.commit()
                .await
                .map_err(|e| Error::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }

    /// Number of migrations applied to this database
    pub async fn schema_version(&self) -> Result<usize> {
        let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;
        Ok(version.max(0) as usize)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_is_fully_migrated() {
        let db = Database::connect_in_memory().await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), MIGRATIONS.len());

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_reopening_file_keeps_rows() {
        let dir = std::env::temp_dir().join(format!("ctbridge-db-{}", std::process::id()));
        let path = dir.join("nested").join("sessions.db");

        let db = Database::connect(&path).await.unwrap();
        sqlx::query("INSERT INTO sessions (id, shop) VALUES ('offline_a', 'a.myshopify.com')")
            .execute(db.pool())
            .await
            .unwrap();
        db.close().await;

        let reopened = Database::connect(&path).await.unwrap();
        assert_eq!(reopened.schema_version().await.unwrap(), MIGRATIONS.len());
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(reopened.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
        reopened.close().await;

        let _ = std::fs::remove_dir_all(dir);
    }
}
