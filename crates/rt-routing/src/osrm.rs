//! HTTP transport for OSRM-compatible routing services.
//!
//! # Request
//!
//! ```text
//! GET {base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat};...
//!     ?overview=full&geometries=geojson&steps=true&alternatives={n|false}
//!     [&exclude={lon},{lat};...]
//! ```
//!
//! # Response
//!
//! `routes[]` with `geometry.coordinates` as `[lon, lat]` pairs (swapped to
//! `GeoPoint { lat, lon }` on ingestion), `distance` in metres, `duration` in
//! seconds and turn-by-turn text under `legs[].steps[].maneuver`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use rt_core::GeoPoint;

use crate::transport::{ProviderRoute, RouteQuery, RoutingTransport};
use crate::{RoutingError, RoutingResult};

/// Public OSRM demo server.
///
/// Stock OSRM reads `exclude` as road-class names (`toll`, `motorway`, ...)
/// and answers a list of points with HTTP 400, which the provider turns
/// into the direct-path fallback.  Point exclusions only help against a
/// service that accepts them; leave `avoid_severe` off against this one.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

// ── Configuration ─────────────────────────────────────────────────────────────

/// Connection settings for [`OsrmTransport`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OsrmConfig {
    /// Service root, without a trailing slash.
    pub base_url:     String,
    /// Whole-request timeout in seconds.  `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url:     DEFAULT_BASE_URL.to_owned(),
            timeout_secs: None,
        }
    }
}

// ── Transport ─────────────────────────────────────────────────────────────────

/// [`RoutingTransport`] backed by `reqwest`.
pub struct OsrmTransport {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmTransport {
    pub fn new(config: OsrmConfig) -> RoutingResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("rt-routing/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RoutingError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }
}

#[async_trait]
impl RoutingTransport for OsrmTransport {
    async fn fetch(&self, query: &RouteQuery) -> RoutingResult<Vec<ProviderRoute>> {
        let url = route_url(&self.config.base_url, query);
        debug!(%url, "requesting route");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RoutingError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::Network(e.to_string()))?;

        // OSRM reports NoRoute and friends as 400 with a JSON body; prefer
        // the service's own code over the bare status when there is one.
        if !status.is_success() {
            return match parse_response(&body) {
                Err(err @ RoutingError::Provider { .. }) => Err(err),
                _ => Err(RoutingError::Status(status.as_u16())),
            };
        }

        parse_response(&body)
    }
}

// ── URL building ──────────────────────────────────────────────────────────────

/// Build the request URL for `query`.  Coordinates go out as `lon,lat`.
pub fn route_url(base_url: &str, query: &RouteQuery) -> String {
    let coords = join_lon_lat(&query.points);
    let alternatives = match query.alternatives {
        0 => "false".to_owned(),
        n => n.to_string(),
    };

    let mut url = format!(
        "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps=true&alternatives={}",
        base_url.trim_end_matches('/'),
        query.profile,
        coords,
        alternatives,
    );
    if !query.exclude.is_empty() {
        url.push_str("&exclude=");
        url.push_str(&join_lon_lat(&query.exclude));
    }
    url
}

fn join_lon_lat(points: &[GeoPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.lon, p.lat))
        .collect::<Vec<_>>()
        .join(";")
}

// ── Response decoding ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    code:    Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes:  Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs:     Vec<OsrmLeg>,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Deserialize)]
struct OsrmStep {
    #[serde(default)]
    maneuver: OsrmManeuver,
    #[serde(default)]
    name:     String,
}

#[derive(Deserialize, Default)]
struct OsrmManeuver {
    #[serde(default)]
    instruction: Option<String>,
    #[serde(default, rename = "type")]
    kind:        Option<String>,
    #[serde(default)]
    modifier:    Option<String>,
}

impl OsrmStep {
    /// The service's own text when present, otherwise "type modifier onto
    /// name" assembled from the maneuver fields.
    fn instruction(self) -> Option<String> {
        if let Some(text) = self.maneuver.instruction {
            return Some(text);
        }
        let mut words: Vec<String> = Vec::new();
        words.extend(self.maneuver.kind);
        words.extend(self.maneuver.modifier);
        if words.is_empty() {
            return None;
        }
        if !self.name.is_empty() {
            words.push(format!("onto {}", self.name));
        }
        Some(words.join(" "))
    }
}

/// Decode an OSRM JSON body into provider routes.
///
/// A non-`"Ok"` code is a [`RoutingError::Provider`]; an `"Ok"` answer with
/// no routes decodes to an empty `Vec`.
pub fn parse_response(body: &str) -> RoutingResult<Vec<ProviderRoute>> {
    let response: OsrmResponse =
        serde_json::from_str(body).map_err(|e| RoutingError::Parse(e.to_string()))?;

    if let Some(code) = response.code.filter(|c| c != "Ok") {
        return Err(RoutingError::Provider {
            code,
            message: response.message.unwrap_or_default(),
        });
    }

    Ok(response
        .routes
        .into_iter()
        .map(|route| ProviderRoute {
            coordinates: route
                .geometry
                .coordinates
                .into_iter()
                .map(|[lon, lat]| GeoPoint::new(lat, lon))
                .collect(),
            distance_m:   route.distance,
            duration_s:   route.duration,
            instructions: route
                .legs
                .into_iter()
                .flat_map(|leg| leg.steps)
                .filter_map(OsrmStep::instruction)
                .collect(),
        })
        .collect())
}
