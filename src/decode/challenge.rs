//! L402 `WWW-Authenticate` challenge parsing.

use once_cell::sync::Lazy;
use regex::Regex;

static MACAROON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"macaroon="([^"]+)""#).expect("static regex"));
static INVOICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"invoice="([^"]+)""#).expect("static regex"));

/// The two attributes an L402 challenge must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L402Challenge {
    pub macaroon: String,
    pub invoice: String,
}

/// Parse `L402 macaroon="...", invoice="..."` (scheme prefix and
/// attribute order are not enforced). Returns `None` when either
/// attribute is missing; never fails harder than that.
pub fn parse_l402_challenge(header: &str) -> Option<L402Challenge> {
    let macaroon = MACAROON_RE.captures(header)?.get(1)?.as_str().to_string();
    let invoice = INVOICE_RE.captures(header)?.get(1)?.as_str().to_string();

    Some(L402Challenge { macaroon, invoice })
}
