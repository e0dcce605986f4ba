//! Incident record and its enumerations.

use std::str::FromStr;

use rt_core::{GeoPoint, IncidentId};

use crate::TrafficError;

/// How badly an incident disrupts traffic.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Major, Severity::Minor];

    /// Critical and major incidents are worth routing around.
    #[inline]
    pub fn is_severe(self) -> bool {
        matches!(self, Severity::Critical | Severity::Major)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Major    => "major",
            Severity::Minor    => "minor",
        }
    }
}

impl FromStr for Severity {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "critical" => Ok(Severity::Critical),
            "major"    => Ok(Severity::Major),
            "minor"    => Ok(Severity::Minor),
            other => Err(TrafficError::Parse(format!("invalid severity {other:?}"))),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened at the incident location.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IncidentKind {
    Accident,
    Construction,
    Closure,
    /// Congestion without a specific cause.  Only the system feed emits it.
    Traffic,
}

impl IncidentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentKind::Accident     => "accident",
            IncidentKind::Construction => "construction",
            IncidentKind::Closure      => "closure",
            IncidentKind::Traffic      => "traffic",
        }
    }
}

impl FromStr for IncidentKind {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "accident"     => Ok(IncidentKind::Accident),
            "construction" => Ok(IncidentKind::Construction),
            "closure"      => Ok(IncidentKind::Closure),
            "traffic"      => Ok(IncidentKind::Traffic),
            other => Err(TrafficError::Parse(format!("invalid incident kind {other:?}"))),
        }
    }
}

impl std::fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of kinds a user may report.
///
/// Severity is not chosen by the reporter; it follows from the kind.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReportKind {
    Accident,
    Construction,
    Closure,
}

impl ReportKind {
    /// Fixed severity for a user report of this kind.
    pub fn severity(self) -> Severity {
        match self {
            ReportKind::Accident     => Severity::Critical,
            ReportKind::Construction => Severity::Major,
            ReportKind::Closure      => Severity::Critical,
        }
    }

    /// Description used when the reporter leaves it blank.
    pub fn default_description(self) -> &'static str {
        match self {
            ReportKind::Accident     => "Accident reported by user",
            ReportKind::Construction => "Men at work",
            ReportKind::Closure      => "Road closed",
        }
    }
}

impl From<ReportKind> for IncidentKind {
    fn from(kind: ReportKind) -> IncidentKind {
        match kind {
            ReportKind::Accident     => IncidentKind::Accident,
            ReportKind::Construction => IncidentKind::Construction,
            ReportKind::Closure      => IncidentKind::Closure,
        }
    }
}

impl FromStr for ReportKind {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "accident"     => Ok(ReportKind::Accident),
            "construction" => Ok(ReportKind::Construction),
            "closure"      => Ok(ReportKind::Closure),
            other => Err(TrafficError::Parse(format!(
                "invalid report kind {other:?}: expected accident, construction, or closure"
            ))),
        }
    }
}

/// Who put the incident into the store.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Reporter {
    /// Seeded by the traffic feed.  Never expires.
    System,
    /// Reported through the reporting API.  Expires after two hours.
    User,
}

impl Reporter {
    pub fn as_str(self) -> &'static str {
        match self {
            Reporter::System => "system",
            Reporter::User   => "user",
        }
    }
}

/// A traffic incident at a point location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    pub id: IncidentId,
    pub location: GeoPoint,
    pub severity: Severity,
    pub kind: IncidentKind,
    pub description: String,
    pub reported_by: Reporter,
    /// Creation time, epoch milliseconds.  Never mutated.
    pub timestamp_ms: i64,
}

impl Incident {
    #[inline]
    pub fn is_severe(&self) -> bool {
        self.severity.is_severe()
    }

    /// `true` once a user report is older than `ttl_ms` at `now_ms`.
    /// System incidents never expire.
    #[inline]
    pub fn is_expired(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.reported_by == Reporter::User && now_ms - self.timestamp_ms > ttl_ms
    }
}
