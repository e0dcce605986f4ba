//! Per-run vehicle state and the end-of-run summary.

use rt_core::GeoPoint;

/// Lifecycle of a [`DriveSimulator`][crate::DriveSimulator].
///
/// ```text
/// Idle ──start──▶ Running ──last segment done──▶ Completed
///                    │
///                    └──────stop───────────────▶ Stopped
/// ```
///
/// Both terminal phases go back to `Running` on the next successful `start`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Completed,
    Stopped,
}

/// Snapshot of the vehicle published once per tick.
///
/// `segment_index` always names a real segment (`< coordinates.len() - 1`).
/// `segment_progress` stays below 1 except on the arrival sample, which
/// reports the last segment fully driven with the position pinned to the
/// destination.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationState {
    pub position:             GeoPoint,
    pub segment_index:        usize,
    pub segment_progress:     f64,
    /// Fraction of the route distance driven, in `[0, 1]`.
    pub total_progress:       f64,
    pub distance_traveled_km: f64,
    /// Remaining distance over the current instantaneous speed.
    pub eta_secs:             f64,
    pub speed_kmh:            f64,
}

impl SimulationState {
    /// State at the start of a run, before the first tick.
    pub(crate) fn at_start(position: GeoPoint, eta_secs: f64) -> Self {
        Self {
            position,
            segment_index:        0,
            segment_progress:     0.0,
            total_progress:       0.0,
            distance_traveled_km: 0.0,
            eta_secs,
            speed_kmh:            0.0,
        }
    }

    /// `true` for the sample emitted on the tick that finishes the route.
    #[inline]
    pub fn is_arrival(&self) -> bool {
        self.segment_progress >= 1.0
    }
}

/// What a finished (completed or stopped) run amounted to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveSummary {
    /// Terminal phase the run ended in.
    pub phase:        Phase,
    /// Samples emitted (one per driving tick).
    pub samples:      u64,
    pub distance_km:  f64,
    pub route_km:     f64,
    /// Simulated seconds spent driving: `samples / tick_hz`.
    pub elapsed_secs: f64,
}

impl DriveSummary {
    #[inline]
    pub fn completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}
