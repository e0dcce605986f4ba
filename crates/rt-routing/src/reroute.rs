//! Incident-aware rerouting.
//!
//! # Decision
//!
//! ```text
//! primary clear of severe incidents      → keep it              (Clear)
//! else first clear alternative exists    → promote it           (Rerouted)
//! else                                   → keep primary, warn   (NoClearRoute)
//! ```
//!
//! "Clear" means no coordinate of the polyline lies within the proximity
//! radius (500 m by default) of any severe incident.  The scan is
//! O(|coords| × |incidents|); polylines are hundreds of points and incident
//! counts are tens, so no spatial index is used.

use tracing::{info, warn};

use rt_core::GeoPoint;
use rt_traffic::{Incident, IncidentStore};

use crate::route::{AlternativeRoute, RouteResult};

/// Distance within which an incident affects a route, metres.
pub const DEFAULT_PROXIMITY_M: f64 = 500.0;

/// Label given to the displaced primary after a reroute.
pub const ORIGINAL_ROUTE_LABEL: &str = "Original (Traffic)";

/// First incident, in `incidents` order, that lies within 500 m of any
/// coordinate in `coords`.
pub fn affected_by<'a>(coords: &[GeoPoint], incidents: &'a [Incident]) -> Option<&'a Incident> {
    affected_within(coords, incidents, DEFAULT_PROXIMITY_M)
}

/// [`affected_by`] with an explicit radius in metres.
pub fn affected_within<'a>(
    coords:    &[GeoPoint],
    incidents: &'a [Incident],
    radius_m:  f64,
) -> Option<&'a Incident> {
    incidents.iter().find(|incident| {
        coords
            .iter()
            .any(|&c| c.distance_m(incident.location) < radius_m)
    })
}

/// What the evaluator decided.
#[derive(Clone, Debug, PartialEq)]
pub enum RerouteOutcome {
    /// The primary route is clear; nothing changed.
    Clear,
    /// An alternative replaced the primary route because of `incident`.
    Rerouted {
        incident: Incident,
        /// Label the promoted alternative carried.
        promoted: String,
    },
    /// Every candidate passes a severe incident; the primary is kept as is.
    /// A warning, not a failure: the route is still usable.
    NoClearRoute { incident: Incident },
}

impl RerouteOutcome {
    /// The incident that triggered the decision, if any.
    pub fn incident(&self) -> Option<&Incident> {
        match self {
            RerouteOutcome::Clear => None,
            RerouteOutcome::Rerouted { incident, .. }
            | RerouteOutcome::NoClearRoute { incident } => Some(incident),
        }
    }

    /// User-facing notice text.
    pub fn message(&self) -> Option<String> {
        match self {
            RerouteOutcome::Clear => None,
            RerouteOutcome::Rerouted { incident, .. } => {
                Some(format!("Rerouted to avoid: {}", incident.description))
            }
            RerouteOutcome::NoClearRoute { incident } => {
                Some(format!("No clear route available: {}", incident.description))
            }
        }
    }
}

/// A route after evaluation plus the decision that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub route:   RouteResult,
    pub outcome: RerouteOutcome,
}

/// Decides whether to keep the primary route or swap in an alternative.
///
/// Stateless: every call recomputes from the route and the current incident
/// set.
#[derive(Clone, Debug)]
pub struct RerouteEvaluator {
    radius_m: f64,
}

impl Default for RerouteEvaluator {
    fn default() -> Self {
        Self { radius_m: DEFAULT_PROXIMITY_M }
    }
}

impl RerouteEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radius(radius_m: f64) -> Self {
        Self { radius_m }
    }

    /// Evaluate `route` against the store's current severe incidents.
    pub fn evaluate(&self, store: &IncidentStore, route: RouteResult) -> Evaluation {
        self.evaluate_against(route, &store.severe())
    }

    /// Evaluate `route` against an explicit incident list.  Minor incidents
    /// in `incidents` are ignored.
    pub fn evaluate_against(&self, route: RouteResult, incidents: &[Incident]) -> Evaluation {
        let severe: Vec<Incident> = incidents.iter().filter(|i| i.is_severe()).cloned().collect();

        let Some(incident) = affected_within(&route.coordinates, &severe, self.radius_m) else {
            return Evaluation { route, outcome: RerouteOutcome::Clear };
        };
        let incident = incident.clone();

        let clear = route
            .alternatives
            .iter()
            .position(|alt| affected_within(&alt.coordinates, &severe, self.radius_m).is_none());

        match clear {
            Some(idx) => {
                let promoted_label = route.alternatives[idx].label.clone();
                info!(
                    incident = %incident.id,
                    description = %incident.description,
                    promoted = %promoted_label,
                    "rerouted around severe incident"
                );
                Evaluation {
                    route:   promote(route, idx),
                    outcome: RerouteOutcome::Rerouted { incident, promoted: promoted_label },
                }
            }
            None => {
                warn!(
                    incident = %incident.id,
                    description = %incident.description,
                    alternatives = route.alternatives.len(),
                    "no clear route around severe incident"
                );
                Evaluation { route, outcome: RerouteOutcome::NoClearRoute { incident } }
            }
        }
    }
}

/// Swap alternative `idx` in as primary.  The old primary becomes the first
/// alternative; the rest keep their order and labels.
fn promote(route: RouteResult, idx: usize) -> RouteResult {
    let RouteResult { coordinates, distance_m, duration_s, mut alternatives, .. } = route;
    let chosen = alternatives.remove(idx);

    let mut rebuilt = Vec::with_capacity(alternatives.len() + 1);
    rebuilt.push(AlternativeRoute {
        label: ORIGINAL_ROUTE_LABEL.to_owned(),
        coordinates,
        distance_m,
        duration_s,
    });
    rebuilt.extend(alternatives);

    RouteResult {
        coordinates:  chosen.coordinates,
        distance_m:   chosen.distance_m,
        duration_s:   chosen.duration_s,
        instructions: Vec::new(),
        alternatives: rebuilt,
    }
}
