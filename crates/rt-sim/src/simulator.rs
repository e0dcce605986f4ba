//! The `DriveSimulator` and its per-tick integrator.

use std::time::Duration;

use tracing::{debug, info, warn};

use rt_core::{GeoPoint, SimClock, SimConfig, SimRng, Tick};
use rt_routing::RouteResult;

use crate::speed::{BandedSpeed, SpeedModel};
use crate::state::{DriveSummary, Phase, SimulationState};
use crate::{DriveError, DriveObserver, DriveResult};

// ── Active run ────────────────────────────────────────────────────────────────

/// Everything that lives only for the duration of one run.
struct Run {
    coords:           Vec<GeoPoint>,
    /// Haversine length of each segment, km.  `len == coords.len() - 1`.
    segment_km:       Vec<f64>,
    total_km:         f64,
    /// Segment being driven.  Reaches `segment_km.len()` on arrival.
    cursor:           usize,
    segment_progress: f64,
    /// Sum of fully driven segments.
    committed_km:     f64,
    /// Distance driven on the current segment.
    partial_km:       f64,
    samples:          u64,
    /// `on_start` is delivered with the first step, when an observer exists.
    announced:        bool,
    state:            SimulationState,
}

impl Run {
    fn new(coords: &[GeoPoint], initial_eta_secs: f64) -> Self {
        let segment_km: Vec<f64> = coords.windows(2).map(|w| w[0].distance_km(w[1])).collect();
        let total_km = segment_km.iter().sum();
        Self {
            coords: coords.to_vec(),
            segment_km,
            total_km,
            cursor: 0,
            segment_progress: 0.0,
            committed_km: 0.0,
            partial_km: 0.0,
            samples: 0,
            announced: false,
            state: SimulationState::at_start(coords[0], initial_eta_secs),
        }
    }

    #[inline]
    fn segment_count(&self) -> usize {
        self.segment_km.len()
    }

    #[inline]
    fn arrived(&self) -> bool {
        self.cursor >= self.segment_count()
    }

    #[inline]
    fn traveled_km(&self) -> f64 {
        self.committed_km + self.partial_km
    }

    /// Fractional position of the current segment within the route.
    ///
    /// `segment_index / segment_count`, not `/ point_count`: segment 1 of a
    /// four-point route sits at 1/3, inside the through-route band.
    #[inline]
    fn route_position(&self) -> f64 {
        self.cursor as f64 / self.segment_count() as f64
    }

    /// Integrate one tick at `speed_kmh` and refresh `state`.
    fn drive(&mut self, speed_kmh: f64, tick_secs: f64) {
        let i = self.cursor;
        let move_m = speed_kmh / 3.6 * tick_secs;
        let segment_m = self.segment_km[i] * 1_000.0;

        // Zero-length segments are crossed in one tick.
        if segment_m > 0.0 {
            self.segment_progress += move_m / segment_m;
        } else {
            self.segment_progress = 1.0;
        }

        if self.segment_progress >= 1.0 {
            // Overshoot past the segment end is dropped.
            self.committed_km += self.segment_km[i];
            self.partial_km = 0.0;
            self.cursor += 1;
            self.segment_progress = 0.0;
        } else {
            self.partial_km += move_m / 1_000.0;
        }

        let traveled_km = self.traveled_km();
        self.state = if self.arrived() {
            SimulationState {
                position:             self.coords[self.coords.len() - 1],
                segment_index:        self.segment_count() - 1,
                segment_progress:     1.0,
                total_progress:       1.0,
                distance_traveled_km: traveled_km,
                eta_secs:             0.0,
                speed_kmh,
            }
        } else {
            let c = self.cursor;
            let total_progress = if self.total_km > 0.0 {
                (traveled_km / self.total_km).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let remaining_km = (self.total_km - traveled_km).max(0.0);
            SimulationState {
                position:             self.coords[c].lerp(self.coords[c + 1], self.segment_progress),
                segment_index:        c,
                segment_progress:     self.segment_progress,
                total_progress,
                distance_traveled_km: traveled_km,
                eta_secs:             remaining_km * 1_000.0 / (speed_kmh / 3.6),
                speed_kmh,
            }
        };
        self.samples += 1;
    }
}

// ── DriveSimulator ────────────────────────────────────────────────────────────

/// Advances one vehicle along a route, one tick at a time.
///
/// Each tick of a running simulator either emits one
/// [`SimulationState`] sample or, once the previous tick finished the last
/// segment, completes the run:
///
/// 1. cursor past the last segment → `Completed`, `on_complete`, state cleared.
/// 2. draw `speed_kmh` from the [`SpeedModel`] at `p = segment / segments`.
/// 3. `move_m = speed_kmh / 3.6 × tick_secs`.
/// 4. advance `segment_progress`; on `≥ 1` commit the segment, move to the
///    next one and reset progress to 0.
/// 5. interpolate the position linearly inside the current segment.
/// 6. recompute total progress and ETA from the instantaneous speed.
/// 7. `on_sample`.
///
/// The simulator has no clock of its own: [`step`][Self::step] is the tick.
/// Drive it in real time with [`spawn_drive`][crate::spawn_drive] or
/// synchronously with [`run_ticks`][Self::run_ticks] /
/// [`run_to_end`][Self::run_to_end].
pub struct DriveSimulator<S: SpeedModel = BandedSpeed> {
    config:  SimConfig,
    clock:   SimClock,
    rng:     SimRng,
    speed:   S,
    phase:   Phase,
    run:     Option<Run>,
    summary: Option<DriveSummary>,
}

impl DriveSimulator<BandedSpeed> {
    /// Simulator with the default banded speed model, seeded from
    /// `config.seed`.
    pub fn new(config: SimConfig) -> Self {
        Self::with_speed_model(config, BandedSpeed)
    }
}

impl<S: SpeedModel> DriveSimulator<S> {
    pub fn with_speed_model(config: SimConfig, speed: S) -> Self {
        let rng = SimRng::new(config.seed);
        Self::with_rng(config, speed, rng)
    }

    /// Simulator drawing from an explicit RNG stream.
    pub fn with_rng(config: SimConfig, speed: S, rng: SimRng) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            rng,
            speed,
            phase: Phase::Idle,
            run: None,
            summary: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current vehicle state; `None` unless a run is active.
    #[inline]
    pub fn state(&self) -> Option<&SimulationState> {
        self.run.as_ref().map(|r| &r.state)
    }

    /// Summary of the last finished run.
    #[inline]
    pub fn summary(&self) -> Option<&DriveSummary> {
        self.summary.as_ref()
    }

    /// Tick the next [`step`][Self::step] will run as.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Wall-clock period between ticks when running in real time.
    #[inline]
    pub fn tick_period(&self) -> Duration {
        self.config.tick_period()
    }

    // ── Control ───────────────────────────────────────────────────────────

    /// Begin a run along `route.coordinates`.
    ///
    /// Replaces any run in progress without notifying anyone.  The tick
    /// counter restarts at zero and the initial ETA is the route's own
    /// duration.
    ///
    /// # Errors
    ///
    /// [`DriveError::DegenerateRoute`] if the route has fewer than two
    /// coordinates.  The simulator is left `Idle` with no state.
    pub fn start(&mut self, route: &RouteResult) -> DriveResult<()> {
        let coords = &route.coordinates;
        if !route.is_drivable() {
            warn!(points = coords.len(), "refusing to drive a degenerate route");
            self.phase = Phase::Idle;
            self.run = None;
            return Err(DriveError::DegenerateRoute(coords.len()));
        }
        if self.phase == Phase::Running {
            debug!("replacing active run");
        }

        let run = Run::new(coords, route.duration_s);
        info!(
            points = coords.len(),
            route_km = run.total_km,
            tick_hz = self.clock.tick_hz,
            "drive started"
        );
        self.clock.reset();
        self.run = Some(run);
        self.summary = None;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Stop the active run before it completes.
    ///
    /// Clears the state, moves to `Stopped` and calls `on_stop`.  Returns
    /// `None` and does nothing when no run is active.
    pub fn stop<O: DriveObserver>(&mut self, observer: &mut O) -> Option<DriveSummary> {
        if self.phase != Phase::Running {
            return None;
        }
        let summary = self.finish(Phase::Stopped);
        info!(
            samples = summary.samples,
            distance_km = summary.distance_km,
            "drive stopped"
        );
        observer.on_stop(self.clock.current_tick, &summary);
        Some(summary)
    }

    /// Run one tick.  Returns the phase afterwards; a simulator that is not
    /// `Running` does nothing.
    pub fn step<O: DriveObserver>(&mut self, observer: &mut O) -> Phase {
        if self.phase != Phase::Running {
            return self.phase;
        }
        let now = self.clock.current_tick;
        let tick_secs = self.clock.tick_secs();

        let Some(run) = self.run.as_mut() else {
            self.phase = Phase::Idle;
            return self.phase;
        };

        if !run.announced {
            run.announced = true;
            observer.on_start(now, &run.coords);
        }

        if run.arrived() {
            let summary = self.finish(Phase::Completed);
            info!(
                samples = summary.samples,
                distance_km = summary.distance_km,
                elapsed_secs = summary.elapsed_secs,
                "drive completed"
            );
            observer.on_complete(now, &summary);
            self.clock.advance();
            return self.phase;
        }

        let speed_kmh = self.speed.speed_kmh(run.route_position(), &mut self.rng);
        run.drive(speed_kmh, tick_secs);
        observer.on_sample(now, &run.state);

        self.clock.advance();
        self.phase
    }

    /// Run up to `n` ticks, stopping early once the run ends.  Returns the
    /// number of samples emitted.
    pub fn run_ticks<O: DriveObserver>(&mut self, n: u64, observer: &mut O) -> u64 {
        let mut emitted = 0;
        for _ in 0..n {
            if self.phase != Phase::Running {
                break;
            }
            let before = self.run.as_ref().map_or(0, |r| r.samples);
            self.step(observer);
            if let Some(run) = &self.run {
                emitted += run.samples - before;
            }
        }
        emitted
    }

    /// Tick until the active run completes.  Returns its summary, or `None`
    /// when there was nothing running.
    pub fn run_to_end<O: DriveObserver>(&mut self, observer: &mut O) -> Option<DriveSummary> {
        if self.phase != Phase::Running {
            return None;
        }
        while self.step(observer) == Phase::Running {}
        self.summary.clone()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Close the active run in `phase` and record its summary.
    fn finish(&mut self, phase: Phase) -> DriveSummary {
        let tick_secs = self.clock.tick_secs();
        let summary = match self.run.take() {
            Some(run) => DriveSummary {
                phase,
                samples:      run.samples,
                distance_km:  run.traveled_km(),
                route_km:     run.total_km,
                elapsed_secs: run.samples as f64 * tick_secs,
            },
            None => DriveSummary {
                phase,
                samples:      0,
                distance_km:  0.0,
                route_km:     0.0,
                elapsed_secs: 0.0,
            },
        };
        self.phase = phase;
        self.summary = Some(summary.clone());
        summary
    }
}

impl<S: SpeedModel> std::fmt::Debug for DriveSimulator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveSimulator")
            .field("phase", &self.phase)
            .field("tick", &self.clock.current_tick)
            .field("state", &self.state())
            .finish()
    }
}
