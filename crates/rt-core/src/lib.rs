//! `rt-core` — foundational types for the route-traffic simulation engine.
//!
//! This crate is a dependency of every other `rt-*` crate.  It has no `rt-*`
//! dependencies and few external ones (`rand`, `thiserror`, `chrono`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`ids`]     | `IncidentId`                                            |
//! | [`geo`]     | `GeoPoint`, haversine distance, interpolation           |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`, wall `Clock` sources   |
//! | [`rng`]     | `SimRng` (seedable simulation RNG)                      |
//! | [`mode`]    | `TravelMode` enum                                       |
//! | [`error`]   | `RtError`, `RtResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{RtError, RtResult};
pub use geo::GeoPoint;
pub use ids::IncidentId;
pub use mode::TravelMode;
pub use rng::SimRng;
pub use time::{Clock, ManualClock, SimClock, SimConfig, SystemClock, Tick};
