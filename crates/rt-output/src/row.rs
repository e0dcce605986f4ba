//! Plain data row types written by telemetry backends.

use rt_core::Tick;
use rt_sim::{DriveSummary, Phase, SimulationState};

/// One simulator sample, flattened for tabular output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRow {
    pub tick:                 u64,
    pub lat:                  f64,
    pub lon:                  f64,
    pub segment_index:        u64,
    pub segment_progress:     f64,
    pub total_progress:       f64,
    pub distance_traveled_km: f64,
    pub eta_secs:             f64,
    pub speed_kmh:            f64,
}

impl SampleRow {
    pub fn from_state(tick: Tick, state: &SimulationState) -> Self {
        Self {
            tick:                 tick.0,
            lat:                  state.position.lat,
            lon:                  state.position.lon,
            segment_index:        state.segment_index as u64,
            segment_progress:     state.segment_progress,
            total_progress:       state.total_progress,
            distance_traveled_km: state.distance_traveled_km,
            eta_secs:             state.eta_secs,
            speed_kmh:            state.speed_kmh,
        }
    }
}

/// How one run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunRow {
    pub final_tick:   u64,
    /// `"completed"` or `"stopped"`.
    pub outcome:      &'static str,
    pub samples:      u64,
    pub distance_km:  f64,
    pub route_km:     f64,
    pub elapsed_secs: f64,
}

impl RunRow {
    pub fn from_summary(tick: Tick, summary: &DriveSummary) -> Self {
        let outcome = match summary.phase {
            Phase::Completed => "completed",
            Phase::Stopped => "stopped",
            Phase::Idle | Phase::Running => "unfinished",
        };
        Self {
            final_tick:   tick.0,
            outcome,
            samples:      summary.samples,
            distance_km:  summary.distance_km,
            route_km:     summary.route_km,
            elapsed_secs: summary.elapsed_secs,
        }
    }
}
