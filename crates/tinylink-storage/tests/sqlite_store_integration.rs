use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tinylink_core::ShortCode;
use tinylink_storage::{
    LinkStore, ReadStore, SqliteLinkStore, SqliteSettings, StorageError, StoreLocation,
};

struct Fixture {
    dir: TempDir,
    store: SqliteLinkStore,
}

impl Fixture {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = open(&dir).await;
        Self { dir, store }
    }

    async fn reopen(self) -> Self {
        self.store.close().await;
        let store = open(&self.dir).await;
        Self {
            dir: self.dir,
            store,
        }
    }
}

async fn open(dir: &TempDir) -> SqliteLinkStore {
    let settings = SqliteSettings::builder()
        .location(StoreLocation::File(dir.path().join("links.sqlite")))
        .max_connections(4)
        .build();
    SqliteLinkStore::connect(&settings)
        .await
        .expect("open sqlite store")
}

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

#[tokio::test]
async fn create_and_get_round_trip() {
    let fixture = Fixture::start().await;

    let created = fixture
        .store
        .create(&code("abc123"), "https://example.com")
        .await
        .unwrap();

    let got = fixture.store.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got, created);
    assert_eq!(got.clicks, 0);
    assert_eq!(got.last_clicked, None);
}

#[tokio::test]
async fn lookups_are_case_sensitive() {
    let fixture = Fixture::start().await;

    fixture
        .store
        .create(&code("abc123"), "https://example.com")
        .await
        .unwrap();

    assert!(fixture.store.get(&code("ABC123")).await.unwrap().is_none());
    fixture
        .store
        .create(&code("ABC123"), "https://upper.example.com")
        .await
        .unwrap();
    assert_eq!(fixture.store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn create_conflicts_when_code_already_exists() {
    let fixture = Fixture::start().await;

    fixture
        .store
        .create(&code("abc123"), "https://one.example")
        .await
        .unwrap();

    let err = fixture
        .store
        .create(&code("abc123"), "https://two.example")
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn delete_is_hard_and_frees_the_code() {
    let fixture = Fixture::start().await;

    fixture
        .store
        .create(&code("gone01"), "https://example.com")
        .await
        .unwrap();

    assert!(fixture.store.delete(&code("gone01")).await.unwrap());
    assert!(fixture.store.get(&code("gone01")).await.unwrap().is_none());
    assert!(!fixture.store.exists(&code("gone01")).await.unwrap());
    assert!(!fixture.store.delete(&code("gone01")).await.unwrap());

    fixture
        .store
        .create(&code("gone01"), "https://again.example")
        .await
        .unwrap();
}

#[tokio::test]
async fn sequential_increments_track_last_click() {
    let fixture = Fixture::start().await;
    fixture
        .store
        .create(&code("abc123"), "https://example.com")
        .await
        .unwrap();

    let mut stamps = vec![];
    for _ in 0..3 {
        let stamp = fixture
            .store
            .increment_click(&code("abc123"))
            .await
            .unwrap()
            .expect("code exists");
        stamps.push(stamp);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let link = fixture.store.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(link.clicks, 3);
    assert_eq!(link.last_clicked, Some(stamps[2]));
    assert!(stamps[0] < stamps[2]);
}

#[tokio::test]
async fn concurrent_increments_are_not_lost() {
    let fixture = Fixture::start().await;
    let store = Arc::new(fixture.store.clone());
    store
        .create(&code("hot001"), "https://example.com")
        .await
        .unwrap();

    let mut handles = vec![];
    for _ in 0..50 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.increment_click(&code("hot001")).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let link = store.get(&code("hot001")).await.unwrap().unwrap();
    assert_eq!(link.clicks, 50);
    assert!(link.last_clicked.is_some());
}

#[tokio::test]
async fn concurrent_creates_of_same_code_admit_one() {
    let fixture = Fixture::start().await;
    let store = Arc::new(fixture.store.clone());

    let mut handles = vec![];
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create(&code("race01"), &format!("https://example{}.com", i))
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, StorageError::Conflict(_)), "{err}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_orders_newest_first() {
    let fixture = Fixture::start().await;

    for value in ["first1", "second", "third3"] {
        fixture
            .store
            .create(&code(value), "https://example.com")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let links = fixture.store.list().await.unwrap();
    let codes: Vec<&str> = links.iter().map(|link| link.code.as_str()).collect();
    assert_eq!(codes, ["third3", "second", "first1"]);
    assert!(links[0].created_at > links[1].created_at);
    assert!(links[1].created_at > links[2].created_at);
}

#[tokio::test]
async fn links_survive_reopening_the_database() {
    let fixture = Fixture::start().await;
    fixture
        .store
        .create(&code("keep01"), "https://example.com")
        .await
        .unwrap();
    fixture.store.increment_click(&code("keep01")).await.unwrap();

    let fixture = fixture.reopen().await;

    let link = fixture.store.get(&code("keep01")).await.unwrap().unwrap();
    assert_eq!(link.target_url, "https://example.com");
    assert_eq!(link.clicks, 1);
}

#[tokio::test]
async fn schema_defaults_apply_to_rows_inserted_elsewhere() {
    let fixture = Fixture::start().await;

    sqlx::query("INSERT INTO links (code, target_url) VALUES (?, ?)")
        .bind("legacy")
        .bind("https://legacy.example")
        .execute(fixture.store.pool())
        .await
        .unwrap();

    let link = fixture.store.get(&code("legacy")).await.unwrap().unwrap();
    assert_eq!(link.clicks, 0);
    assert_eq!(link.last_clicked, None);
    assert!(link.created_at.as_second() > 0);
}
