//! Runs against the Redis at `REDIS_URL`; every test returns early when it is unset.

use chrono::{Duration, TimeZone, Utc};
use redis::AsyncCommands;
use serial_test::serial;
use shortscale::domain::entities::UrlMapping;
use shortscale::domain::repositories::MappingStore;
use shortscale::infrastructure::store::RedisMappingStore;
use std::sync::Arc;

fn redis_url() -> Option<String> {
    std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty())
}

/// Connects and removes any leftover records for `codes`.
async fn setup(codes: &[&str]) -> Option<RedisMappingStore> {
    let url = redis_url()?;

    let client = redis::Client::open(url.as_str()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    for code in codes {
        conn.del::<_, ()>(format!("url:{code}")).await.unwrap();
    }

    Some(RedisMappingStore::connect(&url).await.unwrap())
}

fn mapping(code: &str, url: &str) -> UrlMapping {
    UrlMapping::new(code, url, Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(), None)
}

#[tokio::test]
#[serial]
async fn test_save_find_exists() {
    let Some(store) = setup(&["it-save"]).await else {
        return;
    };

    assert!(!store.exists_by_short_code("it-save").await.unwrap());
    assert!(store.find_by_short_code("it-save").await.unwrap().is_none());

    let mut saved = mapping("it-save", "https://example.com");
    saved.expires_at = Some(saved.created_at + Duration::seconds(60));
    store.save(saved.clone()).await.unwrap();

    assert!(store.exists_by_short_code("it-save").await.unwrap());
    assert_eq!(store.find_by_short_code("it-save").await.unwrap(), Some(saved));
}

#[tokio::test]
#[serial]
async fn test_insert_if_absent() {
    let Some(store) = setup(&["it-nx"]).await else {
        return;
    };

    assert!(store.insert_if_absent(mapping("it-nx", "https://first.com")).await.unwrap());
    assert!(!store.insert_if_absent(mapping("it-nx", "https://second.com")).await.unwrap());

    let found = store.find_by_short_code("it-nx").await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://first.com");
}

#[tokio::test]
#[serial]
async fn test_increment_missing_key() {
    let Some(store) = setup(&["it-ghost"]).await else {
        return;
    };

    assert_eq!(store.increment_click_count("it-ghost").await.unwrap(), None);
    // The script must not create a record for an unknown code
    assert!(!store.exists_by_short_code("it-ghost").await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_increment_keeps_document_readable() {
    let Some(store) = setup(&["it-clicks"]).await else {
        return;
    };

    let saved = mapping("it-clicks", "https://example.com");
    store.save(saved.clone()).await.unwrap();

    assert_eq!(store.increment_click_count("it-clicks").await.unwrap(), Some(1));
    assert_eq!(store.increment_click_count("it-clicks").await.unwrap(), Some(2));

    let found = store.find_by_short_code("it-clicks").await.unwrap().unwrap();
    assert_eq!(found.click_count, 2);
    assert_eq!(found.original_url, saved.original_url);
    assert_eq!(found.created_at, saved.created_at);
    assert!(found.expires_at.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_concurrent_increments_are_not_lost() {
    let Some(store) = setup(&["it-hot"]).await else {
        return;
    };
    let store = Arc::new(store);
    store.save(mapping("it-hot", "https://example.com")).await.unwrap();

    let tasks: Vec<_> = (0..100)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.increment_click_count("it-hot").await.unwrap() })
        })
        .collect();

    let mut seen = Vec::new();
    for task in tasks {
        seen.push(task.await.unwrap().unwrap());
    }
    seen.sort_unstable();

    // Every increment observed a distinct count
    assert_eq!(seen, (1..=100).collect::<Vec<u64>>());
    let found = store.find_by_short_code("it-hot").await.unwrap().unwrap();
    assert_eq!(found.click_count, 100);
}
