//! Logging observer for the drive.

use tracing::info;

use rt_core::{GeoPoint, Tick};
use rt_sim::{DriveObserver, DriveSummary, SimulationState};

/// Logs a progress line every `every` ticks plus the run's start and end.
pub struct ProgressLog {
    every: u64,
}

impl ProgressLog {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

impl DriveObserver for ProgressLog {
    fn on_start(&mut self, _tick: Tick, route: &[GeoPoint]) {
        info!(points = route.len(), "vehicle departing");
    }

    fn on_sample(&mut self, tick: Tick, s: &SimulationState) {
        if tick.0 % self.every != 0 && !s.is_arrival() {
            return;
        }
        info!(
            %tick,
            position = %s.position,
            segment = s.segment_index,
            progress = format_args!("{:.1}%", s.total_progress * 100.0),
            traveled_km = format_args!("{:.3}", s.distance_traveled_km),
            speed_kmh = format_args!("{:.1}", s.speed_kmh),
            eta_secs = format_args!("{:.0}", s.eta_secs),
            "driving"
        );
    }

    fn on_complete(&mut self, tick: Tick, summary: &DriveSummary) {
        info!(
            %tick,
            distance_km = format_args!("{:.3}", summary.distance_km),
            elapsed_secs = format_args!("{:.1}", summary.elapsed_secs),
            "arrived"
        );
    }

    fn on_stop(&mut self, tick: Tick, summary: &DriveSummary) {
        info!(
            %tick,
            distance_km = format_args!("{:.3}", summary.distance_km),
            of_km = format_args!("{:.3}", summary.route_km),
            "drive stopped"
        );
    }
}
