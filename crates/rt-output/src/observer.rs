//! `TelemetryObserver<W>`: bridges `DriveObserver` to a `TelemetryWriter`.

use tracing::warn;

use rt_core::Tick;
use rt_sim::{DriveObserver, DriveSummary, SimulationState};

use crate::row::{RunRow, SampleRow};
use crate::writer::TelemetryWriter;
use crate::{OutputError, OutputResult};

/// A [`DriveObserver`] that records samples and run summaries to any
/// [`TelemetryWriter`].
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the run ends, check with
/// [`take_error`][Self::take_error].
pub struct TelemetryObserver<W: TelemetryWriter> {
    writer:     W,
    /// Write every n-th sample.  The arrival sample is always written.
    interval:   u64,
    last_error: Option<OutputError>,
}

impl<W: TelemetryWriter> TelemetryObserver<W> {
    /// Record every sample.
    pub fn new(writer: W) -> Self {
        Self::every(writer, 1)
    }

    /// Record every `interval`-th tick (0 is treated as 1).
    pub fn every(writer: W, interval: u64) -> Self {
        Self { writer, interval: interval.max(1), last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "telemetry write failed");
                self.last_error = Some(e);
            }
        }
    }

    fn close_run(&mut self, tick: Tick, summary: &DriveSummary) {
        let result = self.writer.write_run(&RunRow::from_summary(tick, summary));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}

impl<W: TelemetryWriter> DriveObserver for TelemetryObserver<W> {
    fn on_sample(&mut self, tick: Tick, state: &SimulationState) {
        if tick.0 % self.interval == 0 || state.is_arrival() {
            let result = self.writer.write_sample(&SampleRow::from_state(tick, state));
            self.store_err(result);
        }
    }

    fn on_complete(&mut self, tick: Tick, summary: &DriveSummary) {
        self.close_run(tick, summary);
    }

    fn on_stop(&mut self, tick: Tick, summary: &DriveSummary) {
        self.close_run(tick, summary);
    }
}
