//! The route provider: query shaping, labelling, and the direct fallback.

use tracing::{debug, warn};

use rt_traffic::IncidentStore;

use crate::route::{AlternativeRoute, RouteResult};
use crate::transport::{ProviderRoute, RouteQuery, RoutingTransport};
use crate::{RouteRequest, RoutingError, RoutingResult};

/// Routes requested from the service when the mode wants alternatives.
const REQUESTED_ROUTES: u8 = 3;

/// Alternatives kept next to the primary route.
const MAX_ALTERNATIVES: usize = 2;

/// Fetches a primary route plus alternatives through a [`RoutingTransport`].
///
/// # Type parameter
///
/// `T` is the transport, e.g. [`OsrmTransport`][crate::OsrmTransport].  Swap
/// it at compile time for a mock in tests.
pub struct RouteProvider<T: RoutingTransport> {
    transport: T,
}

impl<T: RoutingTransport> RouteProvider<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Shape the service query for `request`.
    ///
    /// Severe incidents are read from `store` here, synchronously, so nothing
    /// holds the store across the network call.
    pub fn build_query(&self, store: &IncidentStore, request: &RouteRequest) -> RouteQuery {
        let exclude = if request.avoid_severe && request.mode.honours_exclusions() {
            store.severe().into_iter().map(|i| i.location).collect()
        } else {
            Vec::new()
        };

        RouteQuery {
            points:       request.points.clone(),
            profile:      request.mode.profile(),
            alternatives: if request.mode.wants_alternatives() { REQUESTED_ROUTES } else { 0 },
            exclude,
        }
    }

    /// Compute a route for `request`.
    ///
    /// One round trip, no retries.  Whatever goes wrong on the way (transport
    /// error, bad status, undecodable body, zero routes) yields the
    /// straight-line [`RouteResult::direct`] between the first and last point
    /// instead of an error.
    ///
    /// # Errors
    ///
    /// [`RoutingError::NotEnoughPoints`] when `request` has fewer than two
    /// points; there is no start/end pair to fall back on.
    pub async fn get_route(
        &self,
        store:   &IncidentStore,
        request: &RouteRequest,
    ) -> RoutingResult<RouteResult> {
        let &[start, .., end] = request.points.as_slice() else {
            return Err(RoutingError::NotEnoughPoints(request.points.len()));
        };

        let query = self.build_query(store, request);
        debug!(
            points = query.points.len(),
            exclusions = query.exclude.len(),
            mode = %request.mode,
            "fetching route"
        );

        let mut routes = match self.transport.fetch(&query).await {
            Ok(routes) => routes.into_iter(),
            Err(e) => {
                warn!(error = %e, "falling back to direct path");
                return Ok(RouteResult::direct(start, end));
            }
        };

        match routes.next() {
            Some(primary) if primary.coordinates.len() >= 2 => Ok(assemble(primary, routes)),
            Some(primary) => {
                warn!(
                    points = primary.coordinates.len(),
                    "degenerate primary geometry, falling back to direct path"
                );
                Ok(RouteResult::direct(start, end))
            }
            None => {
                warn!(error = %RoutingError::NoRoutes, "falling back to direct path");
                Ok(RouteResult::direct(start, end))
            }
        }
    }
}

/// First route is primary; up to two more become labelled alternatives in
/// the order received.
fn assemble(primary: ProviderRoute, rest: impl Iterator<Item = ProviderRoute>) -> RouteResult {
    let alternatives = rest
        .take(MAX_ALTERNATIVES)
        .enumerate()
        .map(|(i, r)| AlternativeRoute {
            label:       format!("Alternative {}", i + 1),
            coordinates: r.coordinates,
            distance_m:  r.distance_m,
            duration_s:  r.duration_s,
        })
        .collect();

    RouteResult {
        coordinates:  primary.coordinates,
        distance_m:   primary.distance_m,
        duration_s:   primary.duration_s,
        instructions: primary.instructions,
        alternatives,
    }
}
