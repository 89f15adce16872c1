// Configuration for:
// - Server listening address/port
// - Probe request timeout
// - Capability cache settings (TTL, capacity)

use std::env;
use std::time::Duration;

use dotenv::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub probe_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let probe_timeout = env::var("PROBE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));
        let cache_ttl = env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));
        let cache_max_capacity = env::var("CACHE_MAX_CAPACITY")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .unwrap_or(1000);

        Self {
            server_host,
            server_port,
            probe_timeout,
            cache_ttl,
            cache_max_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            probe_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
            cache_max_capacity: 1000,
        }
    }
}
