//! Capability cache invariants: single-flight de-duplication, TTL
//! expiry, invalidation, and failure caching.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::cache::{EndpointCacheManager, ProbeKey};
use crate::models::{PaymentMethod, ProbeStatus};
use crate::probe::ProbeClient;
use crate::tests::support::{dead_host, l402_headers, spawn_server, INVOICE_10_SATS};

fn test_cache(ttl: Duration) -> EndpointCacheManager {
    let client = ProbeClient::with_timeout(Duration::from_secs(2)).expect("client");
    EndpointCacheManager::with_parts(client, ttl, 100)
}

/// A 402 endpoint that counts how many times it was actually hit.
fn counting_router(counter: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/paid",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                // Hold the response briefly so concurrent fetches overlap.
                tokio::time::sleep(Duration::from_millis(100)).await;
                (
                    StatusCode::PAYMENT_REQUIRED,
                    l402_headers("mac-test", INVOICE_10_SATS),
                    "payment required",
                )
            }
        }),
    )
}

#[tokio::test]
async fn concurrent_fetches_probe_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let host = spawn_server(counting_router(counter.clone())).await;
    let key = ProbeKey::new(&host, "GET", "/paid").unwrap();
    let cache = test_cache(Duration::from_secs(60));

    let (a, b, c) = tokio::join!(cache.fetch(&key), cache.fetch(&key), cache.fetch(&key));

    assert_eq!(counter.load(Ordering::SeqCst), 1, "single-flight violated");
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a.status, ProbeStatus::PaymentRequired);

    // And a follow-up read inside the TTL window stays cached.
    let again = cache.fetch(&key).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(again.created_at, a.created_at);
}

#[tokio::test]
async fn expired_entries_read_as_absent_and_reprobe_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let host = spawn_server(counting_router(counter.clone())).await;
    let key = ProbeKey::new(&host, "GET", "/paid").unwrap();
    let cache = test_cache(Duration::from_millis(150));

    let first = cache.fetch(&key).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(cache.get(&key).await.is_some());

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(
        cache.get(&key).await.is_none(),
        "entry should be absent after TTL"
    );

    let second = cache.fetch(&key).await;
    assert_eq!(counter.load(Ordering::SeqCst), 2, "expiry must reprobe");
    assert!(second.created_at > first.created_at);
}

#[tokio::test]
async fn invalidation_forces_a_fresh_probe() {
    let counter = Arc::new(AtomicUsize::new(0));
    let host = spawn_server(counting_router(counter.clone())).await;
    let key = ProbeKey::new(&host, "GET", "/paid").unwrap();
    let cache = test_cache(Duration::from_secs(60));

    cache.fetch(&key).await;
    cache.invalidate(&key).await;
    assert!(cache.get(&key).await.is_none());

    cache.fetch(&key).await;
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invalidate_all_clears_every_key() {
    let counter = Arc::new(AtomicUsize::new(0));
    let host = spawn_server(counting_router(counter.clone())).await;
    let key = ProbeKey::new(&host, "GET", "/paid").unwrap();
    let cache = test_cache(Duration::from_secs(60));

    cache.fetch(&key).await;
    cache.invalidate_all().await;

    // Moka applies invalidate_all by timestamp; the entry must read as
    // absent immediately.
    assert!(cache.get(&key).await.is_none());
}

#[tokio::test]
async fn transport_failures_are_cached_with_fallback_method() {
    let host = dead_host().await;
    let key = ProbeKey::new(&host, "GET", "/anything").unwrap();
    let cache = test_cache(Duration::from_secs(60));

    let result = cache.fetch(&key).await;
    assert_eq!(result.status, ProbeStatus::Unreachable);
    assert!(!result.is_valid());
    assert!(result.methods.contains(&PaymentMethod::Cashu));
    assert_eq!(result.methods.len(), 1);
    assert!(result.http_status.is_none());

    // The failure itself is memoized: no re-probe within the TTL.
    let cached = cache.fetch(&key).await;
    assert_eq!(cached.created_at, result.created_at);
    assert!(cache.get(&key).await.is_some());
}

#[tokio::test]
async fn held_results_report_expiry_but_cache_reads_stay_fresh() {
    let counter = Arc::new(AtomicUsize::new(0));
    let host = spawn_server(counting_router(counter)).await;
    let key = ProbeKey::new(&host, "GET", "/paid").unwrap();
    let cache = test_cache(Duration::from_secs(60));

    let held = cache.fetch(&key).await;
    assert!(!cache.is_expired(&held));
    assert!(!cache.is_expired(&cache.fetch(&key).await));

    // A result kept around past the TTL reads as expired even though
    // the cache itself would have evicted it by then.
    let mut stale = held;
    stale.created_at -= 120_000;
    assert!(cache.is_expired(&stale));
}

#[tokio::test]
async fn validating_flag_tracks_probe_lifetime() {
    let counter = Arc::new(AtomicUsize::new(0));
    let host = spawn_server(counting_router(counter.clone())).await;
    let key = ProbeKey::new(&host, "GET", "/paid").unwrap();
    let cache = test_cache(Duration::from_secs(60));

    assert!(!cache.is_validating(&key).await);

    let fetcher = {
        let cache = cache.clone();
        let key = key.clone();
        tokio::spawn(async move { cache.fetch(&key).await })
    };

    // The mock endpoint holds its response for 100ms; sample inside
    // that window.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(cache.is_validating(&key).await);

    fetcher.await.unwrap();
    assert!(!cache.is_validating(&key).await);
}
