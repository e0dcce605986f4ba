//! CSV telemetry backend.
//!
//! Creates two files in the configured output directory:
//! - `drive_samples.csv`: one row per emitted sample
//! - `drive_runs.csv`: one row per completed or stopped run

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TelemetryWriter;
use crate::{OutputResult, RunRow, SampleRow};

pub const SAMPLES_FILE: &str = "drive_samples.csv";
pub const RUNS_FILE: &str = "drive_runs.csv";

/// Writes drive telemetry to two CSV files.
pub struct CsvWriter {
    samples:  Writer<File>,
    runs:     Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the output directory if needed, open both files and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut samples = Writer::from_path(dir.join(SAMPLES_FILE))?;
        samples.write_record([
            "tick",
            "lat",
            "lon",
            "segment_index",
            "segment_progress",
            "total_progress",
            "distance_traveled_km",
            "eta_secs",
            "speed_kmh",
        ])?;

        let mut runs = Writer::from_path(dir.join(RUNS_FILE))?;
        runs.write_record(["final_tick", "outcome", "samples", "distance_km", "route_km", "elapsed_secs"])?;

        Ok(Self { samples, runs, finished: false })
    }
}

impl TelemetryWriter for CsvWriter {
    fn write_sample(&mut self, row: &SampleRow) -> OutputResult<()> {
        self.samples.write_record(&[
            row.tick.to_string(),
            row.lat.to_string(),
            row.lon.to_string(),
            row.segment_index.to_string(),
            format!("{:.6}", row.segment_progress),
            format!("{:.6}", row.total_progress),
            format!("{:.6}", row.distance_traveled_km),
            format!("{:.2}", row.eta_secs),
            format!("{:.2}", row.speed_kmh),
        ])?;
        Ok(())
    }

    fn write_run(&mut self, row: &RunRow) -> OutputResult<()> {
        self.runs.write_record(&[
            row.final_tick.to_string(),
            row.outcome.to_owned(),
            row.samples.to_string(),
            format!("{:.6}", row.distance_km),
            format!("{:.6}", row.route_km),
            format!("{:.3}", row.elapsed_secs),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.samples.flush()?;
        self.runs.flush()?;
        Ok(())
    }
}
