// Core value objects shared by the probe, cache and aggregation layers.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Payment scheme advertised by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "L402")]
    L402,
    #[serde(rename = "P2PK")]
    P2pk,
    #[serde(rename = "Cashu")]
    Cashu,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::L402 => write!(f, "L402"),
            PaymentMethod::P2pk => write!(f, "P2PK"),
            PaymentMethod::Cashu => write!(f, "Cashu"),
        }
    }
}

/// Classification of a single probe request.
///
/// Replaces runtime shape checks on an `isValid` flag: consumers match
/// on the variant instead of probing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// 2xx response.
    Ok,
    /// HTTP 402, the interesting case for pricing.
    PaymentRequired,
    /// Any other HTTP status.
    Rejected,
    /// Network error or timeout; no response headers available.
    Unreachable,
}

/// Parsed L402 challenge plus whatever the embedded invoice yielded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInfo {
    pub macaroon: String,
    pub invoice: String,
    /// Floor of the invoice amount in satoshis, when the invoice decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_sats: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_hash: Option<String>,
}

/// Structured view of a NUT-18 Cashu payment request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_sats: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub mint_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_use: Option<bool>,
    /// Public key from a NUT-10 P2PK lock, when the request carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_pubkey: Option<String>,
}

/// Raw `X-Cashu` header plus its decoded form.
///
/// `decoded` stays `None` when the header was present but undecodable;
/// the endpoint still advertised the method, so it is still recorded as
/// supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashuRequestInfo {
    pub raw: String,
    pub decoded: Option<DecodedPaymentRequest>,
}

/// Outcome of probing one endpoint, immutable once cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Never empty: falls back to `{Cashu}` when the endpoint declared
    /// nothing. Policy default carried over from the original client,
    /// not a protocol fact.
    pub methods: BTreeSet<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashu_request: Option<CashuRequestInfo>,
    /// Unix milliseconds.
    pub created_at: i64,
    pub last_checked_at: i64,
}

impl ProbeResult {
    /// A probe is valid when the endpoint answered 2xx or 402.
    pub fn is_valid(&self) -> bool {
        matches!(self.status, ProbeStatus::Ok | ProbeStatus::PaymentRequired)
    }

    /// Every decoded price carried by this result, in satoshis.
    pub fn amounts_sats(&self) -> Vec<u64> {
        let mut amounts = Vec::new();
        if let Some(invoice) = &self.invoice {
            if let Some(sats) = invoice.amount_sats {
                amounts.push(sats);
            }
        }
        if let Some(request) = &self.cashu_request {
            if let Some(decoded) = &request.decoded {
                if let Some(sats) = decoded.amount_sats {
                    amounts.push(sats);
                }
            }
        }
        amounts
    }
}

/// One endpoint of an API listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub method: String,
    pub path: String,
}

/// An API listing as advertised in the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiListing {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub host: String,
    /// Self-declared price, used when no endpoint yields a decoded amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_sats: Option<u64>,
    pub endpoints: Vec<ApiEndpoint>,
}

/// Price range and capabilities derived from the probe results of one
/// API listing. Recomputed per call, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPricingSummary {
    pub min_price_sats: u64,
    pub max_price_sats: u64,
    pub payment_methods: BTreeSet<PaymentMethod>,
    pub mint_urls: Vec<String>,
}
