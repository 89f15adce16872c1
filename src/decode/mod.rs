//! Pure decoders for untrusted challenge-header payloads.
//!
//! Nothing here performs I/O; every function takes a raw string and
//! either yields structured data or degrades without panicking.

pub mod challenge;
pub mod invoice;
pub mod payment_request;

pub use challenge::{parse_l402_challenge, L402Challenge};
pub use invoice::{decode_invoice, millisats_to_sats, DecodedInvoice};
pub use payment_request::decode_payment_request;
