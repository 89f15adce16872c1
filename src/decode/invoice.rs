//! BOLT11 invoice decoding.

use std::str::FromStr;

use lightning_invoice::{Bolt11Invoice, Bolt11InvoiceDescriptionRef};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fields extracted from a BOLT11 invoice. Everything is optional;
/// amount-less invoices are legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedInvoice {
    /// Invoice amount floored to whole satoshis.
    pub amount_sats: Option<u64>,
    pub payment_hash: Option<String>,
    pub description: Option<String>,
    /// Invoice creation time, unix seconds.
    pub timestamp: Option<u64>,
    /// Expiry relative to `timestamp`, in seconds.
    pub expiry: Option<u64>,
}

/// BOLT11 carries amounts in millisatoshis; prices are reported in
/// whole sats, rounding down.
pub fn millisats_to_sats(msats: u64) -> u64 {
    msats / 1000
}

/// Decode a BOLT11 invoice string. Returns `None` on any decode
/// failure; malformed invoices are logged and must not abort the
/// surrounding probe.
pub fn decode_invoice(invoice: &str) -> Option<DecodedInvoice> {
    let parsed = match Bolt11Invoice::from_str(invoice) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Failed to decode invoice: {}", e);
            return None;
        }
    };

    let description = match parsed.description() {
        Bolt11InvoiceDescriptionRef::Direct(d) => Some(d.to_string()),
        Bolt11InvoiceDescriptionRef::Hash(_) => None,
    };

    Some(DecodedInvoice {
        amount_sats: parsed.amount_milli_satoshis().map(millisats_to_sats),
        payment_hash: Some(parsed.payment_hash().to_string()),
        description,
        timestamp: Some(parsed.duration_since_epoch().as_secs()),
        expiry: Some(parsed.expiry_time().as_secs()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 100n = 10 sats.
    const INVOICE_10_SATS: &str = "lnbc100n1p5z3a63pp56854ytysg7e5z9fl3w5mgvrlqjfcytnjv8ff5hm5qt6gl6alxesqdqqcqzzsxqyz5vqsp5p0x0dlhn27s63j4emxnk26p7f94u0lyarnfp5yqmac9gzy4ngdss9qxpqysgqne3v0hnzt2lp0hc69xpzckk0cdcar7glvjhq60lsrfe8gejdm8c564prrnsft6ctxxyrewp4jtezrq3gxxqnfjj0f9tw2qs9y0lslmqpfu7et9";

    #[test]
    fn decodes_amount_and_hash() {
        let decoded = decode_invoice(INVOICE_10_SATS).unwrap();
        assert_eq!(decoded.amount_sats, Some(10));
        assert!(decoded.payment_hash.is_some());
        assert!(decoded.expiry.is_some());
    }

    #[test]
    fn malformed_invoice_is_none() {
        assert!(decode_invoice("lnbcnotarealinvoice").is_none());
        assert!(decode_invoice("").is_none());
    }

    #[test]
    fn sub_sat_amounts_floor_to_zero() {
        assert_eq!(millisats_to_sats(100), 0);
        assert_eq!(millisats_to_sats(999), 0);
        assert_eq!(millisats_to_sats(1000), 1);
        assert_eq!(millisats_to_sats(1999), 1);
    }
}
