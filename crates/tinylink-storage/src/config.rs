use std::path::PathBuf;
use std::time::Duration;
use tinylink_core::error::{StorageError, StorageResult};
use typed_builder::TypedBuilder;

/// SQLite file used when no storage location is configured.
pub const DEFAULT_DATABASE_FILE: &str = "data.sqlite";

/// Where the SQLite store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file on disk.
    File(PathBuf),
    /// A `sqlite:` connection URL, handed to SQLite unchanged.
    Url(String),
    /// A private in-memory database that lives as long as the store.
    Memory,
}

impl StoreLocation {
    /// Resolves a `DATABASE_URL` value.
    ///
    /// - unset or blank: [`DEFAULT_DATABASE_FILE`] in the working directory
    /// - `file:<path>`: the file at `<path>`
    /// - `sqlite::memory:` or `:memory:`: an in-memory database
    /// - `sqlite:...`: passed through as a connection URL
    /// - a bare path: the file at that path
    ///
    /// Any other scheme is rejected, only SQLite is supported.
    pub fn from_database_url(database_url: Option<&str>) -> StorageResult<Self> {
        let Some(url) = database_url.map(str::trim).filter(|url| !url.is_empty()) else {
            return Ok(Self::File(PathBuf::from(DEFAULT_DATABASE_FILE)));
        };

        if url == "sqlite::memory:" || url == ":memory:" {
            return Ok(Self::Memory);
        }

        if let Some(path) = url.strip_prefix("file:") {
            if path.is_empty() {
                return Err(StorageError::Config(
                    "file: location must name a path".to_string(),
                ));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }

        if url.starts_with("sqlite:") {
            return Ok(Self::Url(url.to_string()));
        }

        if let Some((scheme, _)) = url.split_once("://") {
            return Err(StorageError::Config(format!(
                "unsupported storage scheme '{}', only sqlite is available",
                scheme
            )));
        }

        Ok(Self::File(PathBuf::from(url)))
    }
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "file:{}", path.display()),
            StoreLocation::Url(url) => f.write_str(url),
            StoreLocation::Memory => f.write_str("sqlite::memory:"),
        }
    }
}

/// Configures a [`SqliteLinkStore`](crate::SqliteLinkStore).
#[derive(Debug, Clone, TypedBuilder)]
pub struct SqliteSettings {
    /// Where the database lives.
    pub location: StoreLocation,
    /// Upper bound of pooled connections. In-memory stores always use one.
    #[builder(default = 5)]
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing.
    #[builder(default = Duration::from_secs(5))]
    pub busy_timeout: Duration,
    /// Create the database file when it does not exist yet.
    #[builder(default = true)]
    pub create_if_missing: bool,
}

impl SqliteSettings {
    /// Default settings for the location named by a `DATABASE_URL` value.
    pub fn from_database_url(database_url: Option<&str>) -> StorageResult<Self> {
        let location = StoreLocation::from_database_url(database_url)?;
        Ok(Self::builder().location(location).build())
    }
}
