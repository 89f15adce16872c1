// Manual harness: probe a single endpoint and print the cached result.
//
// Usage: probe_endpoint <host> <method> <path>
// e.g.   probe_endpoint api.example.com GET /v1/quote

use payment_probe_service::{cache::EndpointCacheManager, config::Config, ProbeKey};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: {} <host> <method> <path>", args[0]);
        std::process::exit(1);
    }

    let key = ProbeKey::new(&args[1], &args[2], &args[3])?;
    let config = Config::from_env();
    let cache = EndpointCacheManager::new(&config)?;

    println!("Probing {} ...", key);
    let result = cache.fetch(&key).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    println!(
        "valid: {}, methods: {:?}, amounts: {:?}",
        result.is_valid(),
        result.methods,
        result.amounts_sats()
    );

    Ok(())
}
