//! Unit tests for rt-traffic.

use std::sync::Arc;

use rt_core::{GeoPoint, ManualClock};

use crate::{IncidentStore, USER_INCIDENT_TTL_MS};

// ── Helpers ───────────────────────────────────────────────────────────────────

const T0: i64 = 1_700_000_000_000;

fn store_at(start_ms: i64) -> (IncidentStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_ms));
    (IncidentStore::new(clock.clone()), clock)
}

fn somewhere() -> GeoPoint {
    GeoPoint::new(11.0, 76.0)
}

// ── Incident enums ────────────────────────────────────────────────────────────

#[cfg(test)]
mod incident {
    use crate::{IncidentKind, ReportKind, Severity};

    #[test]
    fn report_kind_severity_mapping() {
        assert_eq!(ReportKind::Accident.severity(), Severity::Critical);
        assert_eq!(ReportKind::Construction.severity(), Severity::Major);
        assert_eq!(ReportKind::Closure.severity(), Severity::Critical);
    }

    #[test]
    fn severe_is_critical_or_major() {
        assert!(Severity::Critical.is_severe());
        assert!(Severity::Major.is_severe());
        assert!(!Severity::Minor.is_severe());
    }

    #[test]
    fn parse_names() {
        assert_eq!("traffic".parse::<IncidentKind>().unwrap(), IncidentKind::Traffic);
        assert_eq!("major".parse::<Severity>().unwrap(), Severity::Major);
        assert_eq!("closure".parse::<ReportKind>().unwrap(), ReportKind::Closure);
        assert!("traffic".parse::<ReportKind>().is_err());
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn report_kind_maps_to_incident_kind() {
        assert_eq!(IncidentKind::from(ReportKind::Construction), IncidentKind::Construction);
    }
}

// ── IncidentStore ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use super::*;
    use crate::{IncidentKind, ReportKind, Reporter, Severity};
    use rt_core::{IncidentId, SimRng};

    #[test]
    fn new_store_lists_seed() {
        let (store, _) = store_at(T0);
        let list = store.list();
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|i| i.reported_by == Reporter::System));
        assert_eq!(list[0].id, IncidentId(1));
        assert_eq!(list[2].kind, IncidentKind::Accident);
    }

    #[test]
    fn severe_filters_minor() {
        let (store, _) = store_at(T0);
        let severe = store.severe();
        assert_eq!(severe.len(), 2);
        assert!(severe.iter().all(|i| i.severity != Severity::Minor));
    }

    #[test]
    fn report_then_list_contains_it_once() {
        let (store, _) = store_at(T0);
        let created = store.report(somewhere(), ReportKind::Accident, None);

        let list = store.list();
        let matches: Vec<_> = list.iter().filter(|i| i.id == created.id).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].reported_by, Reporter::User);
        assert_eq!(matches[0].severity, Severity::Critical);
        assert_eq!(matches[0].timestamp_ms, T0);
        // Seeded first, reports after.
        assert_eq!(list.last().map(|i| i.id), Some(created.id));
    }

    #[test]
    fn ids_are_fresh() {
        let (store, _) = store_at(T0);
        let a = store.report(somewhere(), ReportKind::Closure, None);
        let b = store.report(somewhere(), ReportKind::Closure, None);
        assert_ne!(a.id, b.id);
        assert!(store.list().iter().filter(|i| i.id == a.id || i.id == b.id).count() == 2);
        assert!(a.id > IncidentId(3), "must not collide with seed ids");
    }

    #[test]
    fn default_and_custom_descriptions() {
        let (store, _) = store_at(T0);
        let a = store.report(somewhere(), ReportKind::Construction, None);
        assert_eq!(a.description, "Men at work");
        let b = store.report(somewhere(), ReportKind::Closure, Some("   ".into()));
        assert_eq!(b.description, "Road closed");
        let c = store.report(somewhere(), ReportKind::Accident, Some("Truck overturned".into()));
        assert_eq!(c.description, "Truck overturned");
    }

    #[test]
    fn user_reports_expire_after_two_hours() {
        let (store, clock) = store_at(T0);
        let inc = store.report(somewhere(), ReportKind::Accident, None);

        clock.advance_millis(USER_INCIDENT_TTL_MS);
        assert!(store.list().iter().any(|i| i.id == inc.id), "exactly 2 h is still live");

        clock.advance_millis(1);
        let list = store.list();
        assert!(list.iter().all(|i| i.id != inc.id));
        assert_eq!(list.len(), 3, "seed incidents never expire");
    }

    #[test]
    fn purge_is_permanent_and_idempotent() {
        let (store, clock) = store_at(T0);
        let old = store.report(somewhere(), ReportKind::Accident, None);
        clock.advance_millis(USER_INCIDENT_TTL_MS + 1);
        let fresh = store.report(somewhere(), ReportKind::Closure, None);

        let first = store.list();
        let second = store.list();
        assert_eq!(first, second);
        assert!(first.iter().any(|i| i.id == fresh.id));

        // Rewinding the clock does not resurrect a purged report.
        clock.set(T0);
        assert!(store.list().iter().all(|i| i.id != old.id));
    }

    #[test]
    fn seed_survives_any_age() {
        let (store, clock) = store_at(T0);
        clock.advance_millis(30 * 24 * USER_INCIDENT_TTL_MS);
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn fluctuate_keeps_ids_and_timestamps() {
        let (store, _) = store_at(T0);
        let user = store.report(somewhere(), ReportKind::Construction, None);
        let before = store.list();

        let mut rng = SimRng::new(3);
        for _ in 0..10 {
            store.fluctuate(&mut rng);
        }
        let after = store.list();

        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.id, a.id);
            assert_eq!(b.timestamp_ms, a.timestamp_ms);
            assert_eq!(b.location, a.location);
        }
        let user_after = after.iter().find(|i| i.id == user.id).unwrap();
        assert_eq!(user_after.severity, Severity::Major);
    }

    #[test]
    fn report_without_subscribers_does_not_panic() {
        let (store, _) = store_at(T0);
        store.report(somewhere(), ReportKind::Accident, None);
    }
}

// ── Notifications ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use super::*;
    use crate::{IncidentEvent, ReportKind};
    use rt_core::SimRng;

    #[tokio::test]
    async fn report_notifies_subscribers() {
        let (store, _) = store_at(T0);
        let mut rx = store.subscribe();

        let created = store.report(somewhere(), ReportKind::Closure, Some("Bridge shut".into()));

        match rx.recv().await.unwrap() {
            IncidentEvent::Reported(incident) => assert_eq!(incident, created),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn fluctuate_notifies_subscribers() {
        let (store, _) = store_at(T0);
        let mut rx = store.subscribe();
        store.fluctuate(&mut SimRng::new(1));
        assert_eq!(rx.recv().await.unwrap(), IncidentEvent::SeveritiesChanged);
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let (store, _) = store_at(T0);
        store.report(somewhere(), ReportKind::Accident, None);
        let mut rx = store.subscribe();
        assert!(rx.try_recv().is_err());
    }
}

// ── Seed loading ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod seed {
    use std::io::Cursor;

    use super::*;
    use crate::{load_seed_reader, IncidentKind, Severity};

    const SEED_CSV: &str = "\
lat,lon,kind,severity,description\n\
51.510,-0.095,closure,critical,Bridge closed\n\
51.512,-0.100,traffic,minor,\"Slow, but moving\"\n\
";

    #[test]
    fn parses_rows() {
        let seed = load_seed_reader(Cursor::new(SEED_CSV)).unwrap();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].kind, IncidentKind::Closure);
        assert_eq!(seed[0].severity, Severity::Critical);
        assert_eq!(seed[1].description, "Slow, but moving");
        assert!((seed[1].location.lon + 0.100).abs() < 1e-12);
    }

    #[test]
    fn bad_kind_is_an_error() {
        let csv = "lat,lon,kind,severity,description\n1.0,2.0,meteor,critical,boom\n";
        assert!(load_seed_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn bad_number_is_an_error() {
        let csv = "lat,lon,kind,severity,description\nnorth,2.0,closure,critical,x\n";
        assert!(load_seed_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn store_from_custom_seed() {
        let seed = load_seed_reader(Cursor::new(SEED_CSV)).unwrap();
        let clock = Arc::new(ManualClock::new(T0));
        let store = IncidentStore::with_seed(clock, seed);
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.severe().len(), 1);
    }
}
