//! Unit tests for rt-sim.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rt_core::{GeoPoint, SimConfig, Tick};
use rt_routing::RouteResult;

use crate::{
    ConstantSpeed, DriveError, DriveObserver, DriveSimulator, DriveSummary, NoopObserver, Phase,
    SimulationState,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn route(coords: Vec<GeoPoint>) -> RouteResult {
    RouteResult {
        coordinates:  coords,
        distance_m:   222.4,
        duration_s:   20.0,
        instructions: vec![],
        alternatives: vec![],
    }
}

/// Two ~111 m segments along the equator.
fn three_point() -> RouteResult {
    route(vec![
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 0.001),
        GeoPoint::new(0.0, 0.002),
    ])
}

fn config(seed: u64) -> SimConfig {
    SimConfig { tick_hz: 60, seed }
}

/// Observer that keeps everything it is told.
#[derive(Default)]
struct Recorder {
    starts:      Vec<(Tick, Vec<GeoPoint>)>,
    samples:     Vec<(Tick, SimulationState)>,
    completions: Vec<(Tick, DriveSummary)>,
    stops:       Vec<(Tick, DriveSummary)>,
}

impl DriveObserver for Recorder {
    fn on_start(&mut self, tick: Tick, route: &[GeoPoint]) {
        self.starts.push((tick, route.to_vec()));
    }
    fn on_sample(&mut self, tick: Tick, state: &SimulationState) {
        self.samples.push((tick, state.clone()));
    }
    fn on_complete(&mut self, tick: Tick, summary: &DriveSummary) {
        self.completions.push((tick, summary.clone()));
    }
    fn on_stop(&mut self, tick: Tick, summary: &DriveSummary) {
        self.stops.push((tick, summary.clone()));
    }
}

fn drive_to_end(seed: u64) -> Recorder {
    let mut sim = DriveSimulator::new(config(seed));
    sim.start(&three_point()).unwrap();
    let mut rec = Recorder::default();
    sim.run_to_end(&mut rec).unwrap();
    rec
}

// ── Speed model ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use rt_core::SimRng;

    use crate::{BandedSpeed, SpeedBand, SpeedModel};

    #[test]
    fn band_boundaries() {
        assert_eq!(SpeedBand::for_position(0.0), SpeedBand::APPROACH);
        assert_eq!(SpeedBand::for_position(0.09), SpeedBand::APPROACH);
        assert_eq!(SpeedBand::for_position(0.1), SpeedBand::TRANSITION);
        assert_eq!(SpeedBand::for_position(0.3), SpeedBand::TRANSITION);
        assert_eq!(SpeedBand::for_position(0.31), SpeedBand::THROUGH);
        assert_eq!(SpeedBand::for_position(0.5), SpeedBand::THROUGH);
        assert_eq!(SpeedBand::for_position(0.7), SpeedBand::TRANSITION);
        assert_eq!(SpeedBand::for_position(0.9), SpeedBand::TRANSITION);
        assert_eq!(SpeedBand::for_position(0.95), SpeedBand::APPROACH);
    }

    #[test]
    fn banded_speed_stays_within_jittered_band() {
        let mut rng = SimRng::new(7);
        let mut model = BandedSpeed;
        for &(p, band) in &[
            (0.0, SpeedBand::APPROACH),
            (0.2, SpeedBand::TRANSITION),
            (0.5, SpeedBand::THROUGH),
        ] {
            for _ in 0..1_000 {
                let v = model.speed_kmh(p, &mut rng);
                assert!(v >= band.min_kmh * 0.8, "{v} below band at p={p}");
                assert!(v < band.max_kmh * 1.2, "{v} above band at p={p}");
            }
        }
    }

    #[test]
    fn redraws_every_call() {
        let mut rng = SimRng::new(7);
        let mut model = BandedSpeed;
        let a = model.speed_kmh(0.5, &mut rng);
        let b = model.speed_kmh(0.5, &mut rng);
        assert_ne!(a, b);
    }
}

// ── DriveSimulator ────────────────────────────────────────────────────────────

#[cfg(test)]
mod simulator {
    use super::*;

    #[test]
    fn starts_idle_and_does_nothing() {
        let mut sim = DriveSimulator::new(config(1));
        let mut rec = Recorder::default();
        assert_eq!(sim.phase(), Phase::Idle);
        assert!(sim.state().is_none());
        assert_eq!(sim.step(&mut rec), Phase::Idle);
        assert_eq!(sim.run_ticks(10, &mut rec), 0);
        assert!(sim.run_to_end(&mut rec).is_none());
        assert!(rec.starts.is_empty() && rec.samples.is_empty());
        assert_eq!(sim.current_tick(), Tick::ZERO);
    }

    #[test]
    fn degenerate_route_leaves_simulator_idle() {
        let mut sim = DriveSimulator::new(config(1));
        for coords in [vec![], vec![GeoPoint::new(1.0, 1.0)]] {
            let n = coords.len();
            match sim.start(&route(coords)) {
                Err(DriveError::DegenerateRoute(got)) => assert_eq!(got, n),
                other => panic!("expected degenerate route error, got {other:?}"),
            }
            assert_eq!(sim.phase(), Phase::Idle);
            assert!(sim.state().is_none());
        }
        let mut rec = Recorder::default();
        assert_eq!(sim.step(&mut rec), Phase::Idle);
        assert!(rec.samples.is_empty());
    }

    #[test]
    fn initial_state_before_first_tick() {
        let mut sim = DriveSimulator::new(config(1));
        sim.start(&three_point()).unwrap();
        let state = sim.state().unwrap();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(state.position, GeoPoint::new(0.0, 0.0));
        assert_eq!(state.segment_index, 0);
        assert_eq!(state.segment_progress, 0.0);
        assert_eq!(state.total_progress, 0.0);
        assert_eq!(state.eta_secs, 20.0, "route duration until the first tick");
    }

    #[test]
    fn on_start_once_with_route() {
        let rec = drive_to_end(3);
        assert_eq!(rec.starts.len(), 1);
        assert_eq!(rec.starts[0].0, Tick::ZERO);
        assert_eq!(rec.starts[0].1, three_point().coordinates);
    }

    #[test]
    fn three_point_route_completes_exactly_once() {
        let rec = drive_to_end(42);
        let samples = &rec.samples;
        assert!(!samples.is_empty());

        // Segment index never runs past the last real segment.
        assert!(samples.iter().all(|(_, s)| s.segment_index <= 1));

        // The first sample whose segment progress reaches 1 is the last one.
        let arrival = samples
            .iter()
            .position(|(_, s)| s.segment_progress >= 1.0)
            .expect("arrival sample");
        assert_eq!(arrival, samples.len() - 1);

        let (arrival_tick, last) = &samples[arrival];
        assert_eq!(last.segment_index, 1);
        assert!((last.total_progress - 1.0).abs() < 1e-9);
        assert_eq!(last.position, GeoPoint::new(0.0, 0.002));
        assert_eq!(last.eta_secs, 0.0);
        assert!(last.is_arrival());

        for (_, s) in &samples[..arrival] {
            assert!(s.segment_progress < 1.0);
            assert!(s.total_progress < 1.0);
        }

        assert_eq!(rec.completions.len(), 1);
        let (done_tick, summary) = &rec.completions[0];
        assert_eq!(*done_tick, *arrival_tick + 1);
        assert!(summary.completed());
        assert_eq!(summary.samples, samples.len() as u64);
        assert!((summary.distance_km - summary.route_km).abs() < 1e-12);
        assert!(rec.stops.is_empty());
    }

    #[test]
    fn nothing_after_completion() {
        let mut sim = DriveSimulator::new(config(5));
        sim.start(&three_point()).unwrap();
        let mut rec = Recorder::default();
        let summary = sim.run_to_end(&mut rec).unwrap();

        assert_eq!(sim.phase(), Phase::Completed);
        assert!(sim.state().is_none());
        assert_eq!(sim.summary(), Some(&summary));

        let n = rec.samples.len();
        assert_eq!(sim.step(&mut rec), Phase::Completed);
        assert_eq!(sim.run_ticks(100, &mut rec), 0);
        assert!(sim.stop(&mut rec).is_none());
        assert_eq!(rec.samples.len(), n);
        assert_eq!(rec.completions.len(), 1);
        assert!(rec.stops.is_empty());
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        let rec = drive_to_end(9);
        let mut prev = 0.0;
        for (_, s) in &rec.samples {
            assert!((0.0..=1.0).contains(&s.total_progress));
            assert!(s.total_progress >= prev);
            assert!(s.eta_secs >= 0.0);
            prev = s.total_progress;
        }
    }

    #[test]
    fn segment_change_resets_progress_to_segment_start() {
        let rec = drive_to_end(11);
        let first_on_second = rec
            .samples
            .iter()
            .find(|(_, s)| s.segment_index == 1)
            .map(|(_, s)| s.clone())
            .unwrap();
        let seg0_km = GeoPoint::new(0.0, 0.0).distance_km(GeoPoint::new(0.0, 0.001));

        assert_eq!(first_on_second.segment_progress, 0.0);
        assert_eq!(first_on_second.position, GeoPoint::new(0.0, 0.001));
        assert!((first_on_second.distance_traveled_km - seg0_km).abs() < 1e-12);
        assert!((first_on_second.total_progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn constant_speed_kinematics() {
        // 36 km/h = 10 m/s → 1/6 m per tick at 60 Hz.
        let mut sim = DriveSimulator::with_speed_model(config(0), ConstantSpeed(36.0));
        sim.start(&three_point()).unwrap();
        let mut rec = Recorder::default();
        assert_eq!(sim.run_ticks(6, &mut rec), 6);

        let seg_m = GeoPoint::new(0.0, 0.0).distance_m(GeoPoint::new(0.0, 0.001));
        let total_m = 2.0 * seg_m;
        let (tick, s) = &rec.samples[5];
        assert_eq!(*tick, Tick(5));
        assert_eq!(s.speed_kmh, 36.0);
        assert!((s.distance_traveled_km - 0.001).abs() < 1e-12, "six ticks make one metre");
        assert!((s.segment_progress - 1.0 / seg_m).abs() < 1e-9);
        assert!((s.eta_secs - (total_m - 1.0) / 10.0).abs() < 1e-6);
        assert!((s.position.lon - 0.001 / seg_m).abs() < 1e-12);
        assert_eq!(s.position.lat, 0.0);
        assert_eq!(sim.current_tick(), Tick(6));
    }

    #[test]
    fn constant_speed_tick_count() {
        // 222.4 m at 10 m/s with overshoot dropped at each segment end.
        let mut sim = DriveSimulator::with_speed_model(config(0), ConstantSpeed(36.0));
        sim.start(&three_point()).unwrap();
        let summary = sim.run_to_end(&mut NoopObserver).unwrap();

        let seg_m = GeoPoint::new(0.0, 0.0).distance_m(GeoPoint::new(0.0, 0.001));
        let per_segment = (seg_m * 6.0).ceil() as u64;
        assert!(summary.samples.abs_diff(2 * per_segment) <= 2, "{}", summary.samples);
        assert!((summary.elapsed_secs - summary.samples as f64 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn first_segment_uses_approach_band() {
        let rec = drive_to_end(21);
        for (_, s) in rec.samples.iter().filter(|(_, s)| s.segment_index == 0) {
            assert!(s.speed_kmh >= 16.0 && s.speed_kmh < 42.0, "{}", s.speed_kmh);
        }
    }

    /// Constant 36 km/h that remembers every route position it was asked
    /// about.
    struct PositionLog(Arc<std::sync::Mutex<Vec<f64>>>);

    impl crate::SpeedModel for PositionLog {
        fn speed_kmh(&mut self, position: f64, _rng: &mut rt_core::SimRng) -> f64 {
            self.0.lock().unwrap().push(position);
            36.0
        }
    }

    #[test]
    fn position_is_segment_over_segment_count() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut sim = DriveSimulator::with_speed_model(config(1), PositionLog(Arc::clone(&seen)));
        sim.start(&route(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.0, 0.002),
            GeoPoint::new(0.0, 0.003),
        ]))
        .unwrap();
        sim.run_to_end(&mut NoopObserver).unwrap();

        let mut positions = seen.lock().unwrap().clone();
        positions.dedup();
        assert_eq!(positions, vec![0.0, 1.0 / 3.0, 2.0 / 3.0]);
        assert_eq!(crate::SpeedBand::for_position(positions[1]), crate::SpeedBand::THROUGH);
    }

    #[test]
    fn stop_mid_run_emits_nothing_further() {
        let mut sim = DriveSimulator::new(config(2));
        sim.start(&three_point()).unwrap();
        let mut rec = Recorder::default();
        assert_eq!(sim.run_ticks(100, &mut rec), 100);

        let summary = sim.stop(&mut rec).unwrap();
        assert_eq!(summary.phase, Phase::Stopped);
        assert_eq!(summary.samples, 100);
        assert!(summary.distance_km < summary.route_km);
        assert_eq!(sim.phase(), Phase::Stopped);
        assert!(sim.state().is_none());

        assert_eq!(sim.step(&mut rec), Phase::Stopped);
        assert_eq!(sim.run_ticks(50, &mut rec), 0);
        assert!(sim.stop(&mut rec).is_none());

        assert_eq!(rec.samples.len(), 100);
        assert_eq!(rec.stops.len(), 1);
        assert!(rec.completions.is_empty());
    }

    #[test]
    fn restart_after_terminal_phase() {
        let mut sim = DriveSimulator::new(config(4));
        sim.start(&three_point()).unwrap();
        sim.run_ticks(10, &mut NoopObserver);
        sim.stop(&mut NoopObserver);

        sim.start(&three_point()).unwrap();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.current_tick(), Tick::ZERO);
        assert!(sim.summary().is_none());
        let summary = sim.run_to_end(&mut NoopObserver).unwrap();
        assert!(summary.completed());
    }

    #[test]
    fn same_seed_same_trajectory() {
        let a = drive_to_end(77);
        let b = drive_to_end(77);
        assert_eq!(a.samples, b.samples);

        let c = drive_to_end(78);
        assert_ne!(a.samples[0].1.speed_kmh, c.samples[0].1.speed_kmh);
    }

    #[test]
    fn zero_length_segments_are_crossed() {
        let mut sim = DriveSimulator::new(config(6));
        sim.start(&route(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
        ]))
        .unwrap();
        let mut rec = Recorder::default();
        let summary = sim.run_to_end(&mut rec).unwrap();
        assert!(summary.completed());
        assert_eq!(rec.samples[0].1.segment_index, 1, "empty first segment takes one tick");
        assert!(rec.samples.iter().all(|(_, s)| s.total_progress.is_finite() && s.eta_secs.is_finite()));
    }

    #[test]
    fn all_points_equal_completes() {
        let p = GeoPoint::new(10.0, 10.0);
        let mut sim = DriveSimulator::new(config(6));
        sim.start(&route(vec![p, p])).unwrap();
        let mut rec = Recorder::default();
        let summary = sim.run_to_end(&mut rec).unwrap();
        assert_eq!(summary.samples, 1);
        assert_eq!(rec.samples[0].1.total_progress, 1.0);
        assert_eq!(rec.completions.len(), 1);
    }
}

// ── Observer plumbing ─────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use super::*;

    #[test]
    fn pair_fans_out_to_both() {
        let mut sim = DriveSimulator::new(config(8));
        sim.start(&three_point()).unwrap();
        let mut pair = (Recorder::default(), Recorder::default());
        sim.run_ticks(5, &mut pair);
        sim.stop(&mut pair);
        assert_eq!(pair.0.samples, pair.1.samples);
        assert_eq!(pair.0.samples.len(), 5);
        assert_eq!(pair.1.stops.len(), 1);
    }

    #[test]
    fn mut_ref_is_an_observer() {
        let mut rec = Recorder::default();
        let mut sim = DriveSimulator::new(config(8));
        sim.start(&three_point()).unwrap();
        {
            let mut by_ref = &mut rec;
            sim.run_ticks(3, &mut by_ref);
        }
        assert_eq!(rec.samples.len(), 3);
    }
}

// ── Async runner ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod runner {
    use super::*;
    use crate::spawn_drive;

    /// Counts callbacks through shared atomics so tests can look while the
    /// task still owns the observer.
    #[derive(Clone, Default)]
    struct Counters {
        samples:     Arc<AtomicU64>,
        completions: Arc<AtomicU64>,
        stops:       Arc<AtomicU64>,
    }

    impl DriveObserver for Counters {
        fn on_sample(&mut self, _tick: Tick, _state: &SimulationState) {
            self.samples.fetch_add(1, Ordering::SeqCst);
        }
        fn on_complete(&mut self, _tick: Tick, _summary: &DriveSummary) {
            self.completions.fetch_add(1, Ordering::SeqCst);
        }
        fn on_stop(&mut self, _tick: Tick, _summary: &DriveSummary) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion() {
        let mut sim = DriveSimulator::with_speed_model(config(1), ConstantSpeed(72.0));
        sim.start(&three_point()).unwrap();

        let (summary, rec) = spawn_drive(sim, Recorder::default())
            .join_with_observer()
            .await
            .unwrap();

        assert!(summary.completed());
        assert_eq!(rec.completions.len(), 1);
        assert_eq!(rec.samples.len() as u64, summary.samples);
        assert!(rec.samples.last().unwrap().1.is_arrival());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_emission() {
        let mut sim = DriveSimulator::new(config(1));
        sim.start(&three_point()).unwrap();
        let counters = Counters::default();
        let handle = spawn_drive(sim, counters.clone());

        tokio::time::sleep(Duration::from_millis(500)).await;
        handle.stop();
        let seen = counters.samples.load(Ordering::SeqCst);
        assert!(seen > 0);

        let summary = handle.join().await.unwrap();
        assert_eq!(summary.phase, Phase::Stopped);
        assert_eq!(summary.samples, seen);
        assert_eq!(counters.samples.load(Ordering::SeqCst), seen);
        assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
        assert_eq!(counters.completions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_the_run() {
        let mut sim = DriveSimulator::new(config(1));
        sim.start(&three_point()).unwrap();
        let counters = Counters::default();
        let handle = spawn_drive(sim, counters.clone());

        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let seen = counters.samples.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counters.samples.load(Ordering::SeqCst), seen);
        assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
        assert_eq!(counters.completions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stopper_outlives_handle_borrow() {
        let mut sim = DriveSimulator::new(config(1));
        sim.start(&three_point()).unwrap();
        let counters = Counters::default();
        let handle = spawn_drive(sim, counters.clone());
        let stopper = handle.stopper();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            stopper.stop();
        });

        let summary = handle.join().await.unwrap();
        assert_eq!(summary.phase, Phase::Stopped);
        assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_simulator_is_a_join_error() {
        let sim = DriveSimulator::new(config(1));
        let err = spawn_drive(sim, NoopObserver).join().await.unwrap_err();
        assert!(matches!(err, DriveError::Join(_)));
    }
}
