// Initialize configuration
// Set up logging
// Initialize probe client and capability cache
// Create shared state
// Start HTTP server

use std::sync::Arc;

use payment_probe_service::{api, cache::EndpointCacheManager, config::Config, state::AppState};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting payment-probe-service");

    let config = Config::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    let cache = EndpointCacheManager::new(&config)?;
    tracing::info!(
        "Capability cache initialized with TTL: {:?} and capacity: {}",
        config.cache_ttl,
        config.cache_max_capacity
    );

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let app_state = Arc::new(AppState::new(config, cache));

    let app = api::create_router(app_state).layer(CorsLayer::permissive());

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
