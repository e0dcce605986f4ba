//! What the caller asks the route provider for.

use rt_core::{GeoPoint, TravelMode};

/// A routing request: `[start, ...waypoints, end]` visited in order.
///
/// Waypoints are never reordered or optimised.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteRequest {
    pub points:       Vec<GeoPoint>,
    pub mode:         TravelMode,
    /// Pass severe incident locations to the router as exclusions.
    pub avoid_severe: bool,
}

impl RouteRequest {
    /// Start-to-end request with the default mode and no avoidance.
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self::from_points(vec![start, end])
    }

    /// Request over an explicit point sequence.
    pub fn from_points(points: Vec<GeoPoint>) -> Self {
        Self {
            points,
            mode: TravelMode::default(),
            avoid_severe: false,
        }
    }

    /// Insert `waypoints` before the end point, keeping their order.
    pub fn via(mut self, waypoints: impl IntoIterator<Item = GeoPoint>) -> Self {
        match self.points.pop() {
            Some(end) => {
                self.points.extend(waypoints);
                self.points.push(end);
            }
            None => self.points.extend(waypoints),
        }
        self
    }

    pub fn mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn avoid_severe(mut self, avoid: bool) -> Self {
        self.avoid_severe = avoid;
        self
    }

    #[inline]
    pub fn start(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    #[inline]
    pub fn end(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }
}
