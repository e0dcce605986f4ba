//! Transport used by `--offline`.

use async_trait::async_trait;

use rt_routing::{ProviderRoute, RouteQuery, RoutingError, RoutingResult, RoutingTransport};

/// Fails every request so the provider falls back to the direct path.
pub struct OfflineTransport;

#[async_trait]
impl RoutingTransport for OfflineTransport {
    async fn fetch(&self, _query: &RouteQuery) -> RoutingResult<Vec<ProviderRoute>> {
        Err(RoutingError::Network("offline mode".into()))
    }
}
