//! Route result types.

use rt_core::GeoPoint;

/// Text of the single instruction carried by a direct-path fallback route.
pub const FALLBACK_INSTRUCTION: &str = "Route calculation failed - showing direct path";

/// Rough travel-time estimate for a direct path: one minute per kilometre.
pub const FALLBACK_SECS_PER_KM: f64 = 60.0;

/// A candidate route offered next to the primary one.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlternativeRoute {
    pub label:       String,
    pub coordinates: Vec<GeoPoint>,
    pub distance_m:  f64,
    pub duration_s:  f64,
}

/// A primary route plus its alternatives.
///
/// `coordinates` is in travel order, start to end, exactly as the routing
/// service returned it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    pub coordinates:  Vec<GeoPoint>,
    pub distance_m:   f64,
    pub duration_s:   f64,
    pub instructions: Vec<String>,
    pub alternatives: Vec<AlternativeRoute>,
}

impl RouteResult {
    /// Straight line from `start` to `end`, used when routing fails.
    ///
    /// Duration is a fixed ratio of distance, not a real ETA.
    pub fn direct(start: GeoPoint, end: GeoPoint) -> Self {
        let km = start.distance_km(end);
        Self {
            coordinates:  vec![start, end],
            distance_m:   km * 1_000.0,
            duration_s:   km * FALLBACK_SECS_PER_KM,
            instructions: vec![FALLBACK_INSTRUCTION.to_owned()],
            alternatives: Vec::new(),
        }
    }

    /// `true` if this route came from [`RouteResult::direct`].
    pub fn is_direct_fallback(&self) -> bool {
        self.coordinates.len() == 2
            && self.alternatives.is_empty()
            && self.instructions.len() == 1
            && self.instructions[0] == FALLBACK_INSTRUCTION
    }

    /// At least one segment to drive along.
    #[inline]
    pub fn is_drivable(&self) -> bool {
        self.coordinates.len() >= 2
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.coordinates.len().saturating_sub(1)
    }

    #[inline]
    pub fn start(&self) -> Option<GeoPoint> {
        self.coordinates.first().copied()
    }

    #[inline]
    pub fn end(&self) -> Option<GeoPoint> {
        self.coordinates.last().copied()
    }
}
