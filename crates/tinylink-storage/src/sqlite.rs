use crate::config::{SqliteSettings, StoreLocation};
use crate::time;
use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tinylink_core::error::{StorageError, StorageResult};
use tinylink_core::{Link, LinkStore, ReadStore, ShortCode};
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../ddl/sqlite/links.sql");

/// SQLite implementation of the link store contract.
///
/// Uniqueness of codes is enforced by the `UNIQUE` constraint on
/// `links.code`; a violated constraint is reported as
/// [`StorageError::Conflict`]. Deletes are hard deletes, so a removed code
/// can be allocated again. Timestamps are stored as Unix microseconds.
#[derive(Debug, Clone)]
pub struct SqliteLinkStore {
    pool: SqlitePool,
}

impl SqliteLinkStore {
    /// Creates a store from an existing pool.
    ///
    /// The `links` table must already exist, see [`SqliteLinkStore::init_schema`].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for the configured location and creates the schema if
    /// it is absent.
    pub async fn connect(settings: &SqliteSettings) -> StorageResult<Self> {
        let options = connect_options(settings)?;

        let pool_options = match settings.location {
            // Every connection to `:memory:` opens a separate database, so
            // keep exactly one connection alive for the lifetime of the pool.
            StoreLocation::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            _ => SqlitePoolOptions::new().max_connections(settings.max_connections.max(1)),
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.init_schema().await?;

        info!(location = %settings.location, "opened sqlite link store");
        Ok(store)
    }

    /// Creates the `links` table and its index if they do not exist.
    /// Existing data is never touched.
    pub async fn init_schema(&self) -> StorageResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_options(settings: &SqliteSettings) -> StorageResult<SqliteConnectOptions> {
    let options = match &settings.location {
        StoreLocation::File(path) => SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal),
        StoreLocation::Url(url) => SqliteConnectOptions::from_str(url).map_err(|e| {
            StorageError::Config(format!("invalid sqlite url '{}': {e}", url))
        })?,
        StoreLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::Config(e.to_string()))?,
    };

    Ok(options
        .create_if_missing(settings.create_if_missing)
        .busy_timeout(settings.busy_timeout))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::Configuration(_) => StorageError::Config(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn row_to_link(row: &SqliteRow) -> StorageResult<Link> {
    let code: String = row.try_get("code").map_err(map_sqlx_error)?;
    let target_url: String = row.try_get("target_url").map_err(map_sqlx_error)?;
    let clicks: i64 = row.try_get("clicks").map_err(map_sqlx_error)?;
    let last_clicked: Option<i64> = row.try_get("last_clicked").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    let clicks = u64::try_from(clicks).map_err(|_| {
        StorageError::InvalidData(format!("negative click count {} for '{}'", clicks, code))
    })?;

    Ok(Link {
        code: ShortCode::new_unchecked(code),
        target_url,
        clicks,
        last_clicked: last_clicked.map(time::from_micros).transpose()?,
        created_at: time::from_micros(created_at)?,
    })
}

#[async_trait]
impl ReadStore for SqliteLinkStore {
    async fn get(&self, code: &ShortCode) -> StorageResult<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT code, target_url, clicks, last_clicked, created_at
            FROM links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_link).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> StorageResult<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn list(&self) -> StorageResult<Vec<Link>> {
        let rows = sqlx::query(
            r#"
            SELECT code, target_url, clicks, last_clicked, created_at
            FROM links
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_link).collect()
    }
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    async fn create(&self, code: &ShortCode, target_url: &str) -> StorageResult<Link> {
        let created_at = time::now()?;

        let result = sqlx::query(
            r#"
            INSERT INTO links (code, target_url, clicks, last_clicked, created_at)
            VALUES (?, ?, 0, NULL, ?)
            "#,
        )
        .bind(code.as_str())
        .bind(target_url)
        .bind(created_at.as_microsecond())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(Link::new(code.clone(), target_url, created_at)),
            Err(err) if is_unique_violation(&err) => {
                debug!(code = %code, "short code already stored");
                Err(StorageError::Conflict(code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn delete(&self, code: &ShortCode) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM links WHERE code = ?")
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_click(&self, code: &ShortCode) -> StorageResult<Option<Timestamp>> {
        let now = time::now()?;

        let result = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1,
                last_clicked = ?
            WHERE code = ?
            "#,
        )
        .bind(now.as_microsecond())
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok((result.rows_affected() > 0).then_some(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteLinkStore {
        let settings = SqliteSettings::builder()
            .location(StoreLocation::Memory)
            .build();
        SqliteLinkStore::connect(&settings).await.unwrap()
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn create_returns_fresh_record() {
        let store = memory_store().await;

        let link = store
            .create(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        assert_eq!(link.code.as_str(), "abc123");
        assert_eq!(link.clicks, 0);
        assert_eq!(link.last_clicked, None);
        assert_eq!(store.get(&code("abc123")).await.unwrap(), Some(link));
    }

    #[tokio::test]
    async fn unique_constraint_maps_to_conflict() {
        let store = memory_store().await;

        store
            .create(&code("abc123"), "https://example.com")
            .await
            .unwrap();
        let err = store
            .create(&code("abc123"), "https://other.com")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(ref c) if c == "abc123"));
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let store = memory_store().await;
        store
            .create(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        store.init_schema().await.unwrap();

        assert!(store.exists(&code("abc123")).await.unwrap());
    }

    #[tokio::test]
    async fn increment_on_missing_code_touches_nothing() {
        let store = memory_store().await;

        assert_eq!(store.increment_click(&code("nope00")).await.unwrap(), None);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[test]
    fn sqlx_errors_are_classified() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StorageError::Timeout(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StorageError::InvalidData(_)
        ));
    }
}
