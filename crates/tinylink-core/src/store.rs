use crate::error::StorageResult;
use crate::link::Link;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;

/// A read-only view of a link store.
///
/// This trait provides only the read operations from [`LinkStore`],
/// so components that just look links up can be handed read access.
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Retrieves the link for a given short code.
    /// Returns `None` if the code does not exist. Matching is case-sensitive.
    async fn get(&self, code: &ShortCode) -> StorageResult<Option<Link>>;

    /// Checks whether a short code is currently stored.
    async fn exists(&self, code: &ShortCode) -> StorageResult<bool>;

    /// Lists every link, newest first.
    ///
    /// Links are ordered by `created_at` descending; links created at the
    /// same instant are ordered by insertion, latest insertion first.
    async fn list(&self) -> StorageResult<Vec<Link>>;
}

#[async_trait]
pub trait LinkStore: ReadStore {
    /// Inserts a new link with zero clicks and returns the stored record.
    ///
    /// Returns `Err(StorageError::Conflict)` if the code already exists. The
    /// check and the insert are a single atomic step: of two concurrent
    /// creates for the same code exactly one succeeds.
    async fn create(&self, code: &ShortCode, target_url: &str) -> StorageResult<Link>;

    /// Permanently removes the link for a given short code.
    /// Returns `true` if the link existed and was removed.
    async fn delete(&self, code: &ShortCode) -> StorageResult<bool>;

    /// Adds one click and sets `last_clicked` to the current time in one
    /// atomic update.
    ///
    /// Returns the timestamp that was written, or `None` if the code does
    /// not exist.
    async fn increment_click(&self, code: &ShortCode) -> StorageResult<Option<Timestamp>>;
}
