//! NUT-18 Cashu payment-request decoding.

use std::str::FromStr;

use cashu::nuts::nut10::Kind;
use cashu::nuts::nut18::{Error as PaymentRequestError, PaymentRequest};

use crate::models::DecodedPaymentRequest;

/// Decode a base64/CBOR `creqA...` payment request as carried in an
/// `X-Cashu` header.
///
/// Unlike the other decoders this returns `Err` on malformed input: the
/// caller records "header present, decode failed" and keeps the payment
/// method marked as supported.
pub fn decode_payment_request(raw: &str) -> Result<DecodedPaymentRequest, PaymentRequestError> {
    let request = PaymentRequest::from_str(raw.trim())?;

    let lock_pubkey = request
        .nut10
        .as_ref()
        .filter(|secret| secret.kind == Kind::P2PK)
        .map(|secret| secret.data.clone());

    Ok(DecodedPaymentRequest {
        id: request.payment_id.clone(),
        amount_sats: request.amount.map(u64::from),
        unit: request.unit.as_ref().map(|u| u.to_string()),
        mint_urls: request
            .mints
            .iter()
            .map(|mint| mint.to_string())
            .collect(),
        description: request.description.clone(),
        single_use: request.single_use,
        lock_pubkey,
    })
}
