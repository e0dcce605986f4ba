//! `rt-routing` — route acquisition and incident-aware rerouting.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`route`]     | `RouteResult`, `AlternativeRoute`, direct-path fallback     |
//! | [`request`]   | `RouteRequest`: points, travel mode, avoidance flag         |
//! | [`transport`] | `RoutingTransport` trait, `RouteQuery`, `ProviderRoute`     |
//! | [`osrm`]      | `OsrmTransport`: HTTP client for OSRM-compatible services   |
//! | [`provider`]  | `RouteProvider<T>`: query shaping, labelling, fallback      |
//! | [`reroute`]   | `RerouteEvaluator`, `affected_by`, `RerouteOutcome`         |
//! | [`error`]     | `RoutingError`, `RoutingResult<T>`                          |
//!
//! # Flow
//!
//! ```text
//! RouteRequest ──▶ RouteProvider::get_route ──▶ RouteResult
//!                     │  (severe incidents as exclusions)
//!                     ▼
//!               RoutingTransport::fetch  ── failure/empty ──▶ direct fallback
//!
//! RouteResult ──▶ RerouteEvaluator::evaluate ──▶ Evaluation { route, outcome }
//! ```

pub mod error;
pub mod osrm;
pub mod provider;
pub mod request;
pub mod reroute;
pub mod route;
pub mod transport;


pub use error::{RoutingError, RoutingResult};
pub use osrm::{OsrmConfig, OsrmTransport};
pub use provider::RouteProvider;
pub use request::RouteRequest;
pub use reroute::{
    affected_by, affected_within, Evaluation, RerouteEvaluator, RerouteOutcome,
    DEFAULT_PROXIMITY_M, ORIGINAL_ROUTE_LABEL,
};
pub use route::{AlternativeRoute, RouteResult, FALLBACK_INSTRUCTION};
pub use transport::{ProviderRoute, RouteQuery, RoutingTransport};
