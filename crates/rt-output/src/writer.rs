//! The `TelemetryWriter` trait implemented by all backend writers.

use crate::{OutputResult, RunRow, SampleRow};

/// Sink for drive telemetry.
///
/// Errors are returned here but swallowed by
/// [`TelemetryObserver`][crate::TelemetryObserver], which keeps the first one
/// for [`take_error`][crate::TelemetryObserver::take_error].
pub trait TelemetryWriter {
    fn write_sample(&mut self, row: &SampleRow) -> OutputResult<()>;

    /// Record the end of a run.
    fn write_run(&mut self, row: &RunRow) -> OutputResult<()>;

    /// Flush all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
