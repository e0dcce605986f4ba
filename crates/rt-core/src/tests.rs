//! Unit tests for rt-core primitives.

#[cfg(test)]
mod ids {
    use crate::IncidentId;

    #[test]
    fn next_is_sequential() {
        assert_eq!(IncidentId(3).next(), IncidentId(4));
    }

    #[test]
    fn ordering() {
        assert!(IncidentId(0) < IncidentId(1));
    }

    #[test]
    fn display() {
        assert_eq!(IncidentId(7).to_string(), "IncidentId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;
    use crate::geo::EARTH_RADIUS_KM;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(11.002, 76.001);
        assert_eq!(p.distance_km(p), 0.0);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111.195 km on a 6371 km sphere
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_km(b);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn symmetric() {
        let a = GeoPoint::new(51.505, -0.09);
        let b = GeoPoint::new(51.515, -0.092);
        assert!((a.distance_km(b) - b.distance_km(a)).abs() < 1e-12);
    }

    #[test]
    fn monotonic_along_bearing() {
        let origin = GeoPoint::new(10.0, 76.0);
        let mut last = 0.0;
        for i in 1..50 {
            let d = origin.distance_km(GeoPoint::new(10.0, 76.0 + i as f64 * 0.1));
            assert!(d > last, "step {i}: {d} <= {last}");
            last = d;
        }
    }

    #[test]
    fn metres_match_kilometres() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.001);
        assert!((a.distance_m(b) - a.distance_km(b) * 1000.0).abs() < 1e-9);
        // 0.001° of longitude at the equator ≈ 111.2 m
        assert!((a.distance_m(b) - 111.195).abs() < 0.01);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(2.0, 4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), GeoPoint::new(1.0, 2.0));
    }

    #[test]
    fn antipodes_are_half_a_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        for lat in -90..=90 {
            for lon in (-180..180).step_by(10) {
                let a = GeoPoint::new(lat as f64, lon as f64);
                let b = GeoPoint::new(-lat as f64, lon as f64 + 180.0);
                let d = a.distance_km(b);
                assert!(d.is_finite(), "{a} -> {b}: {d}");
                assert!((d - half).abs() < 0.01, "{a} -> {b}: {d}");
            }
        }
    }
}

#[cfg(test)]
mod time {
    use crate::{Clock, ManualClock, SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn clock_elapsed_at_60hz() {
        let mut clock = SimClock::new(60);
        for _ in 0..120 {
            clock.advance();
        }
        assert!((clock.elapsed_secs() - 2.0).abs() < 1e-9);
        clock.reset();
        assert_eq!(clock.current_tick, Tick::ZERO);
    }

    #[test]
    fn zero_hz_is_clamped() {
        assert_eq!(SimClock::new(0).tick_hz, 1);
    }

    #[test]
    fn default_config() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.tick_hz, 60);
        assert!((cfg.make_clock().tick_secs() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_millis(), 1_000);
        clock.advance_millis(500);
        assert_eq!(clock.now_millis(), 1_500);
        clock.set(0);
        assert_eq!(clock.now_millis(), 0);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.gen_range(0.0..1.0f64), b.gen_range(0.0..1.0f64));
        }
    }

    #[test]
    fn gen_range_stays_in_bounds() {
        let mut rng = SimRng::new(1);
        for _ in 0..1_000 {
            let v = rng.gen_range(20.0..35.0f64);
            assert!((20.0..35.0).contains(&v));
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}

#[cfg(test)]
mod mode {
    use crate::TravelMode;

    #[test]
    fn parse_modes() {
        assert_eq!("delivery".parse::<TravelMode>().unwrap(), TravelMode::Delivery);
        assert_eq!("School".parse::<TravelMode>().unwrap(), TravelMode::School);
        assert_eq!("emergency".parse::<TravelMode>().unwrap(), TravelMode::Emergency);
        assert!("hovercraft".parse::<TravelMode>().is_err());
    }

    #[test]
    fn school_runs_skip_alternatives_and_exclusions() {
        assert!(!TravelMode::School.wants_alternatives());
        assert!(!TravelMode::School.honours_exclusions());
        assert!(TravelMode::Delivery.honours_exclusions());
        assert!(TravelMode::Emergency.wants_alternatives());
    }
}
