//! Application configuration: JSON file plus command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use rt_core::{GeoPoint, SimConfig, TravelMode};
use rt_routing::{OsrmConfig, DEFAULT_PROXIMITY_M};
use rt_traffic::ReportKind;

/// Depot the school bus leaves from when no route is configured.
pub const SCHOOL_DEPOT: GeoPoint = GeoPoint::new(51.505, -0.09);

/// Pickup stops visited in order by the default school run.
pub const SCHOOL_PICKUPS: [GeoPoint; 4] = [
    GeoPoint::new(51.510, -0.095),
    GeoPoint::new(51.512, -0.100),
    GeoPoint::new(51.508, -0.085),
    GeoPoint::new(51.515, -0.092),
];

/// Everything the drive binary can be told.  Every field has a default, so
/// a config file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub start:               GeoPoint,
    pub end:                 GeoPoint,
    pub waypoints:           Vec<GeoPoint>,
    pub mode:                TravelMode,
    pub avoid_severe:        bool,
    /// How close a severe incident must be to a route to force a reroute,
    /// metres.
    pub reroute_radius_m:    f64,
    pub sim:                 SimConfig,
    pub osrm:                OsrmConfig,
    /// Skip the routing service and drive the direct path.
    pub offline:             bool,
    /// Seed incidents from this CSV instead of the built-in feed.
    pub seed_csv:            Option<PathBuf>,
    /// Incident feed refresh period, seconds.
    pub poll_secs:           u64,
    /// Re-draw system incident severities on every refresh.
    pub fluctuate:           bool,
    /// Directory for CSV telemetry; none means no files are written.
    pub output_dir:          Option<PathBuf>,
    /// Write every n-th tick to the telemetry CSV.
    pub output_every:        u64,
    /// Log a progress line this often, simulated seconds.
    pub progress_every_secs: u64,
    /// User reports filed before routing.
    pub reports:             Vec<ReportSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start:               GeoPoint::new(10.998, 75.998),
            end:                 GeoPoint::new(11.008, 76.012),
            waypoints:           Vec::new(),
            mode:                TravelMode::Delivery,
            avoid_severe:        false,
            reroute_radius_m:    DEFAULT_PROXIMITY_M,
            sim:                 SimConfig::default(),
            osrm:                OsrmConfig::default(),
            offline:             false,
            seed_csv:            None,
            poll_secs:           5,
            fluctuate:           false,
            output_dir:          None,
            output_every:        1,
            progress_every_secs: 1,
            reports:             Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Points to route through, in order.
    ///
    /// A school run with no configured waypoints starts at the depot and
    /// visits the default pickup stops.
    pub fn route_points(&self) -> Vec<GeoPoint> {
        if self.mode == TravelMode::School && self.waypoints.is_empty() {
            return std::iter::once(SCHOOL_DEPOT).chain(SCHOOL_PICKUPS).collect();
        }
        std::iter::once(self.start)
            .chain(self.waypoints.iter().copied())
            .chain(std::iter::once(self.end))
            .collect()
    }

    /// Ticks between progress log lines.
    pub fn progress_every_ticks(&self) -> u64 {
        (self.progress_every_secs * self.sim.tick_hz as u64).max(1)
    }
}

/// A user report to file at startup, written `kind@lat,lon` on the command
/// line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSpec {
    pub kind:        ReportKind,
    pub location:    GeoPoint,
    #[serde(default)]
    pub description: Option<String>,
}

impl std::str::FromStr for ReportSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((kind, point)) = s.split_once('@') else {
            bail!("expected kind@lat,lon, got {s:?}");
        };
        Ok(Self {
            kind:        kind.trim().parse()?,
            location:    parse_point(point)?,
            description: None,
        })
    }
}

/// Parse `lat,lon`.
pub fn parse_point(s: &str) -> Result<GeoPoint> {
    let Some((lat, lon)) = s.split_once(',') else {
        bail!("expected lat,lon, got {s:?}");
    };
    let lat: f64 = lat.trim().parse().with_context(|| format!("latitude in {s:?}"))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("longitude in {s:?}"))?;
    Ok(GeoPoint::new(lat, lon))
}
