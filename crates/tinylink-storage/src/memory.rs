use crate::time;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use tinylink_core::error::{StorageError, StorageResult};
use tinylink_core::{Link, LinkStore, ReadStore, ShortCode};

/// In-memory storage entry: the link plus its insertion sequence number,
/// which orders links created within the same microsecond.
#[derive(Debug, Clone)]
struct StoredLink {
    link: Link,
    seq: u64,
}

/// In-memory implementation of the link store using DashMap.
///
/// DashMap shards its locks, so operations on different codes rarely
/// contend. Create goes through the entry API and increment through
/// `get_mut`, both under the shard write lock, which makes each of them
/// atomic.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    storage: DashMap<String, StoredLink>,
    next_seq: AtomicU64,
}

impl InMemoryLinkStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadStore for InMemoryLinkStore {
    async fn get(&self, code: &ShortCode) -> StorageResult<Option<Link>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.link.clone()))
    }

    async fn exists(&self, code: &ShortCode) -> StorageResult<bool> {
        Ok(self.storage.contains_key(code.as_str()))
    }

    async fn list(&self) -> StorageResult<Vec<Link>> {
        let mut entries: Vec<StoredLink> = self
            .storage
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        entries.sort_by(|a, b| {
            b.link
                .created_at
                .cmp(&a.link.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(entries.into_iter().map(|entry| entry.link).collect())
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn create(&self, code: &ShortCode, target_url: &str) -> StorageResult<Link> {
        let created_at = time::now()?;

        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                let link = Link::new(code.clone(), target_url, created_at);
                slot.insert(StoredLink {
                    link: link.clone(),
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                });
                Ok(link)
            }
        }
    }

    async fn delete(&self, code: &ShortCode) -> StorageResult<bool> {
        Ok(self.storage.remove(code.as_str()).is_some())
    }

    async fn increment_click(&self, code: &ShortCode) -> StorageResult<Option<Timestamp>> {
        let now = time::now()?;

        let Some(mut entry) = self.storage.get_mut(code.as_str()) else {
            return Ok(None);
        };

        entry.link.clicks += 1;
        entry.link.last_clicked = Some(now);
        Ok(Some(now))
    }
}
