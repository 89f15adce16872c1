//! Cache key for one probeable unit of payment-capability information.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{validate_endpoint, ValidationError};

/// Identifies an endpoint by (host, method, path). Equality is exact
/// string match on the tuple; the method is normalized to uppercase on
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeKey {
    pub host: String,
    pub method: String,
    pub path: String,
}

impl ProbeKey {
    /// Build a key, failing fast on missing or malformed identifying
    /// fields. A probe without a host is a caller bug, not something to
    /// cache.
    pub fn new(host: &str, method: &str, path: &str) -> Result<Self, ValidationError> {
        validate_endpoint(host, method, path)?;

        Ok(Self {
            host: host.trim().to_string(),
            method: method.trim().to_uppercase(),
            path: path.trim().to_string(),
        })
    }
}

impl fmt::Display for ProbeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.host, self.method, self.path)
    }
}
