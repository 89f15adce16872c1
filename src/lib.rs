pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod decode;
pub mod models;
pub mod probe;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export the pieces consumers wire together.
pub use aggregator::{ApiValidation, ApiValidator};
pub use api::error::ApiError;
pub use api::response::ApiResponse;
pub use api::route::create_router;
pub use cache::{EndpointCacheManager, ProbeKey};
pub use config::Config;
pub use models::{ApiListing, ApiPricingSummary, PaymentMethod, ProbeResult, ProbeStatus};
pub use probe::{ProbeClient, ProbeError};
pub use validation::{validate_endpoint, validate_host, validate_method, validate_path};
