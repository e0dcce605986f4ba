//! Seed incidents: the built-in mock feed and a CSV loader.
//!
//! # CSV format
//!
//! One row per system incident.  `kind` and `severity` use the lowercase
//! names of [`IncidentKind`] and [`Severity`].
//!
//! ```csv
//! lat,lon,kind,severity,description
//! 11.005,76.008,traffic,major,Heavy traffic on bypass
//! 11.002,76.001,accident,critical,"Accident, road blocked"
//! ```
//!
//! Ids and timestamps are assigned by the store, not read from the file.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rt_core::GeoPoint;

use crate::{IncidentKind, Severity, TrafficError, TrafficResult};

/// A system incident before the store has assigned it an id and timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct SeedIncident {
    pub location:    GeoPoint,
    pub kind:        IncidentKind,
    pub severity:    Severity,
    pub description: String,
}

/// The built-in mock traffic feed.
pub fn default_seed() -> Vec<SeedIncident> {
    vec![
        SeedIncident {
            location:    GeoPoint::new(11.005, 76.008),
            kind:        IncidentKind::Traffic,
            severity:    Severity::Major,
            description: "Heavy traffic on bypass".into(),
        },
        SeedIncident {
            location:    GeoPoint::new(10.995, 76.010),
            kind:        IncidentKind::Construction,
            severity:    Severity::Minor,
            description: "Men at work".into(),
        },
        SeedIncident {
            location:    GeoPoint::new(11.002, 76.001),
            kind:        IncidentKind::Accident,
            severity:    Severity::Critical,
            description: "Accident, road blocked".into(),
        },
    ]
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SeedRecord {
    lat:         f64,
    lon:         f64,
    kind:        String,
    severity:    String,
    #[serde(default)]
    description: String,
}

/// Load seed incidents from a CSV file.
pub fn load_seed_csv(path: &Path) -> TrafficResult<Vec<SeedIncident>> {
    let file = std::fs::File::open(path).map_err(TrafficError::Io)?;
    load_seed_reader(file)
}

/// Like [`load_seed_csv`] but accepts any `Read` source.
pub fn load_seed_reader<R: Read>(reader: R) -> TrafficResult<Vec<SeedIncident>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    csv_reader
        .deserialize::<SeedRecord>()
        .map(|result| -> TrafficResult<SeedIncident> {
            let row = result.map_err(|e| TrafficError::Parse(e.to_string()))?;
            Ok(SeedIncident {
                location:    GeoPoint::new(row.lat, row.lon),
                kind:        row.kind.parse()?,
                severity:    row.severity.parse()?,
                description: row.description,
            })
        })
        .collect()
}
