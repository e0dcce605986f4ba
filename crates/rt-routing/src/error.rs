//! Routing-subsystem error type.

use thiserror::Error;

/// Errors produced by `rt-routing`.
///
/// Only [`RoutingError::NotEnoughPoints`] ever reaches callers of
/// [`RouteProvider::get_route`][crate::RouteProvider::get_route]; every
/// transport-level error is absorbed by the direct-path fallback.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("a route needs at least 2 points, got {0}")]
    NotEnoughPoints(usize),

    #[error("network error: {0}")]
    Network(String),

    #[error("routing service returned HTTP {0}")]
    Status(u16),

    #[error("routing service answered {code:?}: {message}")]
    Provider { code: String, message: String },

    #[error("invalid routing response: {0}")]
    Parse(String),

    #[error("routing service returned no routes")]
    NoRoutes,
}

pub type RoutingResult<T> = Result<T, RoutingError>;
