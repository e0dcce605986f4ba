//! `rt-traffic` — the traffic incident registry.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`incident`] | `Incident`, `Severity`, `IncidentKind`, `ReportKind`      |
//! | [`store`]    | `IncidentStore`, list/report/expiry, `IncidentEvent`      |
//! | [`seed`]     | Built-in seed incidents and the CSV seed loader           |
//! | [`error`]    | `TrafficError`, `TrafficResult<T>`                        |
//!
//! # Ownership
//!
//! There is no global registry.  The application creates one
//! [`IncidentStore`] per session and hands references (or an `Arc`) to the
//! route provider, the reroute evaluator and whatever UI reports incidents.
//! Change notifications go out on a `tokio::sync::broadcast` channel obtained
//! from [`IncidentStore::subscribe`].

pub mod error;
pub mod incident;
pub mod seed;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{TrafficError, TrafficResult};
pub use incident::{Incident, IncidentKind, ReportKind, Reporter, Severity};
pub use seed::{default_seed, load_seed_csv, load_seed_reader, SeedIncident};
pub use store::{IncidentEvent, IncidentStore, USER_INCIDENT_TTL_MS};
