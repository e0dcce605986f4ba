//! Travel mode enum shared by the routing and simulation crates.

use std::str::FromStr;

use crate::{RtError, RtResult};

/// What kind of trip is being planned.
///
/// The mode decides how the routing request is shaped: whether alternatives
/// are requested and whether severe incidents are passed as exclusions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TravelMode {
    /// Parcel delivery, shortest distance.
    #[default]
    Delivery,
    /// School bus visiting every pickup point in the given order.
    School,
    /// Emergency vehicle, fastest route.
    Emergency,
}

impl TravelMode {
    /// `true` when the router should be asked for alternative routes.
    ///
    /// School runs are pinned to their pickup sequence, so there is nothing
    /// to choose between.
    #[inline]
    pub fn wants_alternatives(self) -> bool {
        !matches!(self, TravelMode::School)
    }

    /// `true` when severe incidents are sent to the router as exclusions.
    #[inline]
    pub fn honours_exclusions(self) -> bool {
        matches!(self, TravelMode::Delivery | TravelMode::Emergency)
    }

    /// Routing-service profile name.  All modes drive.
    #[inline]
    pub fn profile(self) -> &'static str {
        "driving"
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Delivery  => "delivery",
            TravelMode::School    => "school",
            TravelMode::Emergency => "emergency",
        }
    }
}

impl FromStr for TravelMode {
    type Err = RtError;

    fn from_str(s: &str) -> RtResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delivery"              => Ok(TravelMode::Delivery),
            "school" | "school_bus" => Ok(TravelMode::School),
            "emergency"             => Ok(TravelMode::Emergency),
            other => Err(RtError::Parse(format!(
                "unknown travel mode {other:?}: expected delivery, school, or emergency"
            ))),
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
