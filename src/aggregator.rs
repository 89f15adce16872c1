//! Whole-API validation: fan probes out over every endpoint of a
//! listing and fold the results into a pricing summary.

use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{EndpointCacheManager, ProbeKey};
use crate::models::{ApiListing, ApiPricingSummary, ProbeResult};
use crate::validation::ValidationError;

/// Probe results for one API listing plus the derived summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidation {
    /// Keyed by `"{api id}-{METHOD}-{path}"`.
    pub results: HashMap<String, ProbeResult>,
    pub summary: ApiPricingSummary,
}

/// Validates all endpoints of an API listing through the shared cache.
#[derive(Clone)]
pub struct ApiValidator {
    cache: EndpointCacheManager,
}

impl ApiValidator {
    pub fn new(cache: EndpointCacheManager) -> Self {
        Self { cache }
    }

    /// Fetch every endpoint of the listing concurrently and join. One
    /// endpoint failing never fails the listing as a whole: failures
    /// come back as `Unreachable` results and are simply not priced.
    ///
    /// Contract errors (empty host, unknown method, no endpoints) fail
    /// fast before any request is made.
    pub async fn validate_all(&self, api: &ApiListing) -> Result<ApiValidation, ValidationError> {
        let keys = Self::probe_keys(api)?;

        info!(
            "Validating API {} ({} endpoints)",
            api.id,
            keys.len()
        );

        let fetches = keys.iter().map(|(_, key)| self.cache.fetch(key));
        let outcomes = join_all(fetches).await;

        let results: HashMap<String, ProbeResult> = keys
            .into_iter()
            .map(|(result_key, _)| result_key)
            .zip(outcomes)
            .collect();

        let summary = Self::summarize(api, results.values());
        debug!("Validation summary for {}: {:?}", api.id, summary);

        Ok(ApiValidation { results, summary })
    }

    /// True while any endpoint of the listing has a probe in flight.
    pub async fn is_validating(&self, api: &ApiListing) -> Result<bool, ValidationError> {
        for (_, key) in Self::probe_keys(api)? {
            if self.cache.is_validating(&key).await {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn probe_keys(api: &ApiListing) -> Result<Vec<(String, ProbeKey)>, ValidationError> {
        if api.endpoints.is_empty() {
            return Err(ValidationError::NoEndpoints);
        }

        api.endpoints
            .iter()
            .map(|endpoint| {
                let key = ProbeKey::new(&api.host, &endpoint.method, &endpoint.path)?;
                let result_key = format!("{}-{}-{}", api.id, key.method, key.path);
                Ok((result_key, key))
            })
            .collect()
    }

    /// Fold valid probe results into a price range, payment-method
    /// union and mint-URL union. When no endpoint yielded a decoded
    /// amount the listing's self-declared price is used for both
    /// bounds.
    fn summarize<'a, I>(api: &ApiListing, results: I) -> ApiPricingSummary
    where
        I: Iterator<Item = &'a ProbeResult>,
    {
        let mut amounts: Vec<u64> = Vec::new();
        let mut payment_methods = BTreeSet::new();
        let mut mint_urls = BTreeSet::new();

        for result in results.filter(|r| r.is_valid()) {
            amounts.extend(result.amounts_sats());
            payment_methods.extend(result.methods.iter().copied());

            if let Some(request) = &result.cashu_request {
                if let Some(decoded) = &request.decoded {
                    mint_urls.extend(decoded.mint_urls.iter().cloned());
                }
            }
        }

        let (min_price_sats, max_price_sats) = match (amounts.iter().min(), amounts.iter().max()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => {
                let fallback = api.price_sats.unwrap_or(0);
                (fallback, fallback)
            }
        };

        ApiPricingSummary {
            min_price_sats,
            max_price_sats,
            payment_methods,
            mint_urls: mint_urls.into_iter().collect(),
        }
    }
}
