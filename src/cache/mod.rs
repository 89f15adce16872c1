pub mod endpoint;
pub mod keys;

pub use endpoint::EndpointCacheManager;
pub use keys::ProbeKey;
