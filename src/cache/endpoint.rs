//! Endpoint capability cache using Moka.
//!
//! Read-through, TTL-bounded memoization of probe results with
//! single-flight de-duplication: concurrent `fetch` calls for the same
//! key share one underlying probe via `Cache::get_with`.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::keys::ProbeKey;
use crate::config::Config;
use crate::decode::{decode_invoice, decode_payment_request, parse_l402_challenge};
use crate::models::{CashuRequestInfo, InvoiceInfo, PaymentMethod, ProbeResult, ProbeStatus};
use crate::probe::{ProbeClient, ProbeError, RawProbeResponse};

/// Manages cached payment-capability data per endpoint.
///
/// This is the error boundary for probing: `fetch` never fails, a probe
/// that errors is converted into an `Unreachable` result and cached with
/// the normal TTL so a broken endpoint is not hammered on every read.
#[derive(Clone)]
pub struct EndpointCacheManager {
    cache: Cache<ProbeKey, ProbeResult>,
    /// Keys with a probe currently in flight. Entries are added and
    /// removed inside the single-flight init future, so membership
    /// mirrors exactly one underlying probe per key.
    validating: Arc<Mutex<HashSet<ProbeKey>>>,
    client: ProbeClient,
    ttl: Duration,
}

impl EndpointCacheManager {
    pub fn new(config: &Config) -> Result<Self, ProbeError> {
        Ok(Self::with_parts(
            ProbeClient::new(config)?,
            config.cache_ttl,
            config.cache_max_capacity,
        ))
    }

    pub fn with_parts(client: ProbeClient, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self {
            cache,
            validating: Arc::new(Mutex::new(HashSet::new())),
            client,
            ttl,
        }
    }

    /// Get a cached result if present and unexpired. Expired entries
    /// are evicted by the cache itself and read as absent.
    pub async fn get(&self, key: &ProbeKey) -> Option<ProbeResult> {
        let result = self.cache.get(key).await;
        if result.is_some() {
            debug!("Cache hit for key: {}", key);
        } else {
            debug!("Cache miss for key: {}", key);
        }
        result
    }

    /// Read-through fetch. Returns the cached result when valid.
    /// Otherwise probes the endpoint at most once per key across
    /// concurrent callers and caches whatever comes back, failures
    /// included.
    pub async fn fetch(&self, key: &ProbeKey) -> ProbeResult {
        if let Some(cached) = self.cache.get(key).await {
            debug!("Cache hit for key: {}", key);
            return cached;
        }

        let this = self.clone();
        let probe_key = key.clone();
        self.cache
            .get_with(key.clone(), async move { this.probe_endpoint(probe_key).await })
            .await
    }

    /// True while a probe for this key is in flight.
    pub async fn is_validating(&self, key: &ProbeKey) -> bool {
        self.validating.lock().await.contains(key)
    }

    /// Whether a result has outlived the cache TTL. Moka evicts expired
    /// entries, so anything read back through `get`/`fetch` reports
    /// false here; the check only turns true for callers holding a
    /// result across the TTL window.
    pub fn is_expired(&self, result: &ProbeResult) -> bool {
        let age = Utc::now().timestamp_millis() - result.created_at;
        age > self.ttl.as_millis() as i64
    }

    pub async fn invalidate(&self, key: &ProbeKey) {
        self.cache.invalidate(key).await;
        info!("Invalidated cache entry for key: {}", key);
    }

    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        info!("Invalidated all cached endpoint data");
    }

    async fn probe_endpoint(&self, key: ProbeKey) -> ProbeResult {
        {
            let mut validating = self.validating.lock().await;
            validating.insert(key.clone());
        }

        let outcome = self.client.probe(&key).await;
        let result = match outcome {
            Ok(raw) => Self::assemble_result(&key, &raw),
            Err(e) => {
                error!("Probe failed for {}: {}", key, e);
                Self::failure_result()
            }
        };

        {
            let mut validating = self.validating.lock().await;
            validating.remove(&key);
        }

        result
    }

    /// Turn a raw response into a `ProbeResult`, decoding whatever
    /// challenge headers are present. Decode failures degrade: the
    /// method stays supported, only the structured detail is withheld.
    fn assemble_result(key: &ProbeKey, raw: &RawProbeResponse) -> ProbeResult {
        let mut methods = BTreeSet::new();

        let invoice = raw
            .www_authenticate
            .as_deref()
            .and_then(parse_l402_challenge)
            .map(|challenge| {
                methods.insert(PaymentMethod::L402);
                let decoded = decode_invoice(&challenge.invoice);
                InvoiceInfo {
                    macaroon: challenge.macaroon,
                    invoice: challenge.invoice,
                    amount_sats: decoded.as_ref().and_then(|d| d.amount_sats),
                    payment_hash: decoded.and_then(|d| d.payment_hash),
                }
            });

        let cashu_request = raw.x_cashu.as_deref().map(|raw_header| {
            methods.insert(PaymentMethod::P2pk);
            let decoded = match decode_payment_request(raw_header) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    error!("Failed to decode Cashu payment request for {}: {}", key, e);
                    None
                }
            };
            CashuRequestInfo {
                raw: raw_header.to_string(),
                decoded,
            }
        });

        // No challenge headers at all: record the Cashu fallback. This
        // mirrors the original client's policy default rather than
        // anything the endpoint declared.
        if methods.is_empty() {
            methods.insert(PaymentMethod::Cashu);
        }

        let status = if raw.is_success() {
            ProbeStatus::Ok
        } else if raw.is_payment_required() {
            ProbeStatus::PaymentRequired
        } else {
            ProbeStatus::Rejected
        };

        let now = Utc::now().timestamp_millis();
        ProbeResult {
            status,
            http_status: Some(raw.status),
            methods,
            invoice,
            cashu_request,
            created_at: now,
            last_checked_at: now,
        }
    }

    fn failure_result() -> ProbeResult {
        let now = Utc::now().timestamp_millis();
        ProbeResult {
            status: ProbeStatus::Unreachable,
            http_status: None,
            methods: BTreeSet::from([PaymentMethod::Cashu]),
            invoice: None,
            cashu_request: None,
            created_at: now,
            last_checked_at: now,
        }
    }
}
