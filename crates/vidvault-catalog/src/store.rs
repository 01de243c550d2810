//! SQLite catalog store.

use std::collections::HashSet;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use vidvault_core::{CatalogRecord, CatalogStats};

use crate::error::CatalogError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS videos (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    raw_name        TEXT    NOT NULL,
    normalized_name TEXT    NOT NULL UNIQUE,
    storage_key     TEXT    NOT NULL,
    uploaded        INTEGER NOT NULL DEFAULT 0,
    size_bytes      INTEGER NOT NULL DEFAULT 0,
    width           INTEGER,
    height          INTEGER,
    duration        REAL,
    privacy_level   INTEGER NOT NULL DEFAULT 3,
    description     TEXT
)
"#;

const RECORD_COLUMNS: &str = "id, raw_name, normalized_name, storage_key, uploaded, \
     size_bytes, width, height, duration, privacy_level, description";

pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    /// Opens (creating if needed) the catalog at `descriptor` and ensures the
    /// schema exists.
    ///
    /// The in-memory descriptor gets a single-connection pool: each SQLite
    /// in-memory connection is an independent database, so a larger pool
    /// would scatter schema and rows across unrelated databases.
    pub async fn connect(descriptor: &str) -> Result<Self, CatalogError> {
        let options = SqliteConnectOptions::from_str(descriptor)?.create_if_missing(true);
        let in_memory = descriptor.contains(":memory:") || descriptor.contains("mode=memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect_with(options)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// One-shot existence check: which of `names` already have a catalog row.
    pub async fn existing_names(&self, names: &[&str]) -> Result<HashSet<String>, CatalogError> {
        if names.is_empty() {
            return Ok(HashSet::new());
        }

        // SQLite has no array binds; build one placeholder per name.
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql =
            format!("SELECT normalized_name FROM videos WHERE normalized_name IN ({placeholders})");

        let mut query = sqlx::query_scalar::<_, String>(&sql);
        for name in names {
            query = query.bind(*name);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().collect())
    }

    /// Inserts every record in a single transaction; any failure rolls the
    /// whole batch back. Returns the records with their assigned row ids.
    pub async fn insert_batch(
        &self,
        records: Vec<CatalogRecord>,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        if records.is_empty() {
            return Ok(records);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(records.len());
        for mut record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO videos
                    (raw_name, normalized_name, storage_key, uploaded, size_bytes,
                     width, height, duration, privacy_level, description)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.raw_name)
            .bind(&record.normalized_name)
            .bind(&record.storage_key)
            .bind(record.uploaded)
            .bind(record.size_bytes)
            .bind(record.width)
            .bind(record.height)
            .bind(record.duration_seconds)
            .bind(record.privacy_level)
            .bind(&record.description)
            .execute(&mut *tx)
            .await?;
            record.id = Some(result.last_insert_rowid());
            inserted.push(record);
        }
        tx.commit().await?;
        Ok(inserted)
    }

    /// Substring search over normalized names. Terms are trimmed, lowercased
    /// and AND-combined; `*` inside a term acts as a wildcard. No terms
    /// matches everything.
    pub async fn search(&self, terms: &[String]) -> Result<Vec<CatalogRecord>, CatalogError> {
        let patterns: Vec<String> = terms
            .iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .map(|term| format!("%{}%", term.replace('*', "%")))
            .collect();

        let mut sql = format!("SELECT {RECORD_COLUMNS} FROM videos");
        if !patterns.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&vec!["normalized_name LIKE ?"; patterns.len()].join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, CatalogRecord>(&sql);
        for pattern in &patterns {
            query = query.bind(pattern);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Catalog-wide aggregates.
    pub async fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let stats = sqlx::query_as::<_, CatalogStats>(
            r#"
            SELECT
                COUNT(*)                     AS total,
                COALESCE(SUM(uploaded), 0)   AS uploaded,
                COALESCE(SUM(size_bytes), 0) AS total_size_bytes,
                COALESCE(SUM(duration), 0.0) AS total_duration
            FROM videos
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
