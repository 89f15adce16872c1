use crate::aggregator::ApiValidator;
use crate::cache::EndpointCacheManager;
use crate::config::Config;

pub struct AppState {
    pub config: Config,
    pub cache: EndpointCacheManager,
    pub validator: ApiValidator,
}

impl AppState {
    pub fn new(config: Config, cache: EndpointCacheManager) -> Self {
        let validator = ApiValidator::new(cache.clone());
        Self {
            config,
            cache,
            validator,
        }
    }
}
