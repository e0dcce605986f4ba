//! `rt-sim` — drives a vehicle along a route, one tick at a time.
//!
//! # Tick loop
//!
//! ```text
//! start(route) ──▶ Running
//!   every tick:
//!     ① arrived last tick?  → Completed, on_complete, state cleared
//!     ② speed  = SpeedModel(segment / segments)      (banded + jitter)
//!     ③ move_m = speed / 3.6 × tick_secs
//!     ④ segment_progress += move_m / segment_m       (≥ 1 → next segment)
//!     ⑤ position = lerp(segment start, end, progress)
//!     ⑥ total_progress, eta = remaining / speed
//!     ⑦ on_sample(tick, &state)
//! stop() ──▶ Stopped, on_stop, nothing further
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rt_core::SimConfig;
//! use rt_sim::{spawn_drive, DriveSimulator, NoopObserver};
//!
//! let mut sim = DriveSimulator::new(SimConfig::default());
//! sim.start(&route)?;
//! let handle = spawn_drive(sim, NoopObserver);
//! let summary = handle.join().await?;
//! ```

pub mod error;
pub mod observer;
pub mod runner;
pub mod simulator;
pub mod speed;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{DriveError, DriveResult};
pub use observer::{DriveObserver, NoopObserver};
pub use runner::{spawn_drive, DriveHandle, DriveStopper};
pub use simulator::DriveSimulator;
pub use speed::{BandedSpeed, ConstantSpeed, SpeedBand, SpeedModel};
pub use state::{DriveSummary, Phase, SimulationState};
