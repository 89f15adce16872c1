//! Shared helpers: in-process HTTP servers standing in for pay-per-call
//! endpoints.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use axum::Router;
use cashu::nuts::nut18::PaymentRequest;
use cashu::nuts::CurrencyUnit;
use cashu::Amount;

// 100n = 10 sats.
pub const INVOICE_10_SATS: &str = "lnbc100n1p5z3a63pp56854ytysg7e5z9fl3w5mgvrlqjfcytnjv8ff5hm5qt6gl6alxesqdqqcqzzsxqyz5vqsp5p0x0dlhn27s63j4emxnk26p7f94u0lyarnfp5yqmac9gzy4ngdss9qxpqysgqne3v0hnzt2lp0hc69xpzckk0cdcar7glvjhq60lsrfe8gejdm8c564prrnsft6ctxxyrewp4jtezrq3gxxqnfjj0f9tw2qs9y0lslmqpfu7et9";

pub const TEST_MINT: &str = "https://mint.test.example.com";

/// Serve the router on an ephemeral local port and return a host string
/// (`http://127.0.0.1:<port>`) usable as a `ProbeKey` host.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    format!("http://{}", addr)
}

/// Bind and immediately drop a listener to get a port nothing answers
/// on.
pub async fn dead_host() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn l402_headers(macaroon: &str, invoice: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_str(&format!(
            "L402 macaroon=\"{}\", invoice=\"{}\"",
            macaroon, invoice
        ))
        .expect("header value"),
    );
    headers
}

pub fn x_cashu_headers(payment_request: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-cashu"),
        HeaderValue::from_str(payment_request).expect("header value"),
    );
    headers
}

/// Encode a minimal sat-denominated NUT-18 payment request.
pub fn payment_request_str(amount_sats: u64, mint: &str) -> String {
    PaymentRequest::builder()
        .amount(Amount::from(amount_sats))
        .unit(CurrencyUnit::Sat)
        .add_mint(mint.parse().expect("valid mint url"))
        .build()
        .to_string()
}
