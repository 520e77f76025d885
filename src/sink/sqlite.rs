// src/sink/sqlite.rs
// =============================================================================
// SQLite storage for crawl results.
//
// Tables:
// - responses: one row per URL (url, status_code, content_size, page_title).
//   Writing the same URL twice replaces the old row.
// - run_statistics: one row per finished crawl; the per-domain and
//   per-status maps are stored as JSON text.
//
// The pool holds a single connection: SQLite only has one writer anyway,
// and it keeps writes in exactly the order they were made.
// =============================================================================

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use super::{FetchRecord, ResultSink};
use crate::crawl::RunStatistics;
use crate::error::SinkError;

pub struct SqliteSink {
    pool: SqlitePool,
}

impl SqliteSink {
    // Opens (or creates) the database file at `path`
    pub async fn open(path: &Path) -> Result<Self, SinkError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::connect(options).await
    }

    // A throwaway database that lives as long as the sink
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, SinkError> {
        let options: SqliteConnectOptions = "sqlite::memory:".parse()?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self, SinkError> {
        // Never recycle the connection: for ":memory:" that would throw the
        // data away
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let sink = Self { pool };
        sink.create_tables().await?;
        Ok(sink)
    }

    async fn create_tables(&self) -> Result<(), SinkError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                url TEXT PRIMARY KEY,
                status_code INTEGER,
                content_size INTEGER,
                page_title TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS run_statistics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                total_completed INTEGER NOT NULL,
                total_errors INTEGER NOT NULL,
                per_domain TEXT NOT NULL,
                per_status TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ResultSink for SqliteSink {
    async fn record_fetch(&self, record: &FetchRecord) -> Result<(), SinkError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO responses (url, status_code, content_size, page_title)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.url)
        .bind(i64::from(record.status))
        .bind(record.content_size as i64)
        .bind(&record.title)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_run_summary(&self, summary: &RunStatistics) -> Result<(), SinkError> {
        let per_domain = serde_json::to_string(&summary.per_domain)?;
        let per_status = serde_json::to_string(&summary.per_status)?;

        sqlx::query(
            r#"
            INSERT INTO run_statistics (total_completed, total_errors, per_domain, per_status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(summary.total_completed as i64)
        .bind(summary.total_errors as i64)
        .bind(per_domain)
        .bind(per_status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
