//! The seam between the route provider and the routing service.
//!
//! [`RouteProvider`][crate::RouteProvider] talks to the service only through
//! [`RoutingTransport`], so tests and offline demos can swap in their own
//! implementation without touching query shaping or the fallback path.

use async_trait::async_trait;

use rt_core::GeoPoint;

use crate::RoutingResult;

/// A fully shaped request to the routing service.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteQuery {
    /// Points to visit, in order.
    pub points:       Vec<GeoPoint>,
    /// Service profile, e.g. `"driving"`.
    pub profile:      &'static str,
    /// How many routes to ask for in total; `0` disables alternatives.
    pub alternatives: u8,
    /// Point locations to keep away from.  Best effort: the service may
    /// ignore exclusions it cannot honour.
    pub exclude:      Vec<GeoPoint>,
}

/// One route as returned by the service, already in internal axis order.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderRoute {
    pub coordinates:  Vec<GeoPoint>,
    pub distance_m:   f64,
    pub duration_s:   f64,
    pub instructions: Vec<String>,
}

/// Pluggable routing backend.
///
/// Implementations perform a single round trip per call: no retries, no
/// caching.  An `Ok` result may be empty; the provider treats that the same
/// as a failure.
#[async_trait]
pub trait RoutingTransport: Send + Sync {
    async fn fetch(&self, query: &RouteQuery) -> RoutingResult<Vec<ProviderRoute>>;
}

#[async_trait]
impl<T: RoutingTransport + ?Sized> RoutingTransport for std::sync::Arc<T> {
    async fn fetch(&self, query: &RouteQuery) -> RoutingResult<Vec<ProviderRoute>> {
        (**self).fetch(query).await
    }
}
