//! Speed models: how fast the vehicle goes on a given tick.
//!
//! The default [`BandedSpeed`] picks a band from where the current segment
//! sits in the route and then applies ±20 % multiplicative jitter:
//!
//! | Route position `p`     | Band (km/h) | Meaning              |
//! |------------------------|-------------|----------------------|
//! | `p < 0.1` or `p > 0.9` | `[20, 35)`  | approach / departure |
//! | `0.3 < p < 0.7`        | `[45, 70)`  | through-route        |
//! | otherwise              | `[30, 50)`  | transitional         |
//!
//! Every tick redraws both samples, so speed is noisy frame to frame.  That
//! models traffic variability, not acceleration.

use rt_core::SimRng;

/// Lower bound of the multiplicative jitter factor.
pub const JITTER_MIN: f64 = 0.8;
/// Upper bound (exclusive) of the multiplicative jitter factor.
pub const JITTER_MAX: f64 = 1.2;

/// Half-open speed interval `[min_kmh, max_kmh)`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpeedBand {
    pub min_kmh: f64,
    pub max_kmh: f64,
}

impl SpeedBand {
    pub const APPROACH:   SpeedBand = SpeedBand { min_kmh: 20.0, max_kmh: 35.0 };
    pub const THROUGH:    SpeedBand = SpeedBand { min_kmh: 45.0, max_kmh: 70.0 };
    pub const TRANSITION: SpeedBand = SpeedBand { min_kmh: 30.0, max_kmh: 50.0 };

    /// Band for a segment at fractional route position `p`.
    pub fn for_position(p: f64) -> SpeedBand {
        if p < 0.1 || p > 0.9 {
            SpeedBand::APPROACH
        } else if p > 0.3 && p < 0.7 {
            SpeedBand::THROUGH
        } else {
            SpeedBand::TRANSITION
        }
    }

    #[inline]
    pub fn sample(self, rng: &mut SimRng) -> f64 {
        rng.gen_range(self.min_kmh..self.max_kmh)
    }
}

/// Source of the per-tick vehicle speed.
///
/// `position` is `segment_index / segment_count`, in `[0, 1)`.  The result
/// must be strictly positive; a zero speed would stall the run.
pub trait SpeedModel {
    fn speed_kmh(&mut self, position: f64, rng: &mut SimRng) -> f64;
}

/// Position-banded speed with jitter.  The default model.
#[derive(Copy, Clone, Debug, Default)]
pub struct BandedSpeed;

impl SpeedModel for BandedSpeed {
    fn speed_kmh(&mut self, position: f64, rng: &mut SimRng) -> f64 {
        let base = SpeedBand::for_position(position).sample(rng);
        base * rng.gen_range(JITTER_MIN..JITTER_MAX)
    }
}

/// Fixed speed, no randomness.  Handy for tests and replay.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantSpeed(pub f64);

impl SpeedModel for ConstantSpeed {
    fn speed_kmh(&mut self, _position: f64, _rng: &mut SimRng) -> f64 {
        self.0
    }
}
