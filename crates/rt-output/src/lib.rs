//! `rt-output` — drive telemetry writers.
//!
//! | Backend | Files created                          |
//! |---------|----------------------------------------|
//! | CSV     | `drive_samples.csv`, `drive_runs.csv`  |
//!
//! Backends implement [`TelemetryWriter`] and are driven by
//! [`TelemetryObserver`], which implements `rt_sim::DriveObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rt_output::{CsvWriter, TelemetryObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TelemetryObserver::new(writer);
//! sim.run_to_end(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TelemetryObserver;
pub use row::{RunRow, SampleRow};
pub use writer::TelemetryWriter;
