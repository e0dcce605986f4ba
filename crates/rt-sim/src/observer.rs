//! Drive observer trait for telemetry and UI updates.

use rt_core::{GeoPoint, Tick};

use crate::state::{DriveSummary, SimulationState};

/// Callbacks invoked by the [`DriveSimulator`][crate::DriveSimulator] as a
/// run progresses.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  After `on_complete` or `on_stop` the
/// run emits nothing further.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl DriveObserver for Progress {
///     fn on_sample(&mut self, tick: Tick, state: &SimulationState) {
///         if tick.0 % 60 == 0 {
///             println!("{tick}: {:.0}%", state.total_progress * 100.0);
///         }
///     }
/// }
/// ```
pub trait DriveObserver {
    /// A run started on `route`.  Called before the first sample.
    fn on_start(&mut self, _tick: Tick, _route: &[GeoPoint]) {}

    /// The state after one driving tick.
    fn on_sample(&mut self, _tick: Tick, _state: &SimulationState) {}

    /// The run finished the last segment.  Called exactly once per run.
    fn on_complete(&mut self, _tick: Tick, _summary: &DriveSummary) {}

    /// The run was stopped before completion.
    fn on_stop(&mut self, _tick: Tick, _summary: &DriveSummary) {}
}

impl<O: DriveObserver + ?Sized> DriveObserver for &mut O {
    fn on_start(&mut self, tick: Tick, route: &[GeoPoint]) {
        (**self).on_start(tick, route)
    }

    fn on_sample(&mut self, tick: Tick, state: &SimulationState) {
        (**self).on_sample(tick, state)
    }

    fn on_complete(&mut self, tick: Tick, summary: &DriveSummary) {
        (**self).on_complete(tick, summary)
    }

    fn on_stop(&mut self, tick: Tick, summary: &DriveSummary) {
        (**self).on_stop(tick, summary)
    }
}

/// Fans every callback out to both observers, left first.
impl<A: DriveObserver, B: DriveObserver> DriveObserver for (A, B) {
    fn on_start(&mut self, tick: Tick, route: &[GeoPoint]) {
        self.0.on_start(tick, route);
        self.1.on_start(tick, route);
    }

    fn on_sample(&mut self, tick: Tick, state: &SimulationState) {
        self.0.on_sample(tick, state);
        self.1.on_sample(tick, state);
    }

    fn on_complete(&mut self, tick: Tick, summary: &DriveSummary) {
        self.0.on_complete(tick, summary);
        self.1.on_complete(tick, summary);
    }

    fn on_stop(&mut self, tick: Tick, summary: &DriveSummary) {
        self.0.on_stop(tick, summary);
        self.1.on_stop(tick, summary);
    }
}

/// A [`DriveObserver`] that does nothing.
pub struct NoopObserver;

impl DriveObserver for NoopObserver {}
