//! Probe executor: one unauthenticated request per endpoint.

use std::str::FromStr;
use std::time::Duration;

use reqwest::header::WWW_AUTHENTICATE;
use reqwest::{Client, Method};
use thiserror::Error;
use tracing::debug;

use crate::cache::ProbeKey;
use crate::config::Config;

const X_CASHU: &str = "x-cashu";

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid HTTP method: {0}")]
    Method(String),
}

/// Status line and challenge headers of a probe response, before any
/// decoding.
#[derive(Debug, Clone)]
pub struct RawProbeResponse {
    pub status: u16,
    pub www_authenticate: Option<String>,
    pub x_cashu: Option<String>,
}

impl RawProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_payment_required(&self) -> bool {
        self.status == 402
    }
}

/// Issues probe requests with a bounded timeout. No retries: a single
/// probe is authoritative until the cache entry expires.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    client: Client,
}

impl ProbeClient {
    pub fn new(config: &Config) -> Result<Self, ProbeError> {
        let client = Client::builder().timeout(config.probe_timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Bare hosts are probed over https; an explicit scheme in the host
    /// is kept as-is.
    pub fn endpoint_url(key: &ProbeKey) -> String {
        if key.host.starts_with("http://") || key.host.starts_with("https://") {
            format!("{}{}", key.host, key.path)
        } else {
            format!("https://{}{}", key.host, key.path)
        }
    }

    /// Perform exactly one request against the endpoint, with no body
    /// and no authentication, and pull out the challenge headers.
    /// Header names are matched case-insensitively per HTTP semantics.
    pub async fn probe(&self, key: &ProbeKey) -> Result<RawProbeResponse, ProbeError> {
        let method =
            Method::from_str(&key.method).map_err(|_| ProbeError::Method(key.method.clone()))?;
        let url = Self::endpoint_url(key);

        debug!("Probing {} {}", key.method, url);
        let response = self.client.request(method, &url).send().await?;

        let header_string = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        let raw = RawProbeResponse {
            status: response.status().as_u16(),
            www_authenticate: header_string(WWW_AUTHENTICATE.as_str()),
            x_cashu: header_string(X_CASHU),
        };

        debug!(
            "Probe {} {} returned status {} (www-authenticate: {}, x-cashu: {})",
            key.method,
            url,
            raw.status,
            raw.www_authenticate.is_some(),
            raw.x_cashu.is_some()
        );

        Ok(raw)
    }
}
