//! Link store implementations.
//!
//! [`SqliteLinkStore`] is the persistent store used in production.
//! [`InMemoryLinkStore`] keeps links in a concurrent map and is handy for
//! tests and throwaway runs.

pub mod config;
pub mod memory;
pub mod sqlite;
mod time;

pub use config::{SqliteSettings, StoreLocation, DEFAULT_DATABASE_FILE};
pub use memory::InMemoryLinkStore;
pub use sqlite::SqliteLinkStore;
pub use tinylink_core::error::{StorageError, StorageResult};
pub use tinylink_core::{LinkStore, ReadStore};
