//! The `IncidentStore`: seeded and user-reported incidents.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, info};

use rt_core::{Clock, GeoPoint, IncidentId, SimRng};

use crate::seed::{default_seed, SeedIncident};
use crate::{Incident, ReportKind, Reporter, Severity};

/// User reports are purged once older than this (two hours).
pub const USER_INCIDENT_TTL_MS: i64 = 2 * 60 * 60 * 1_000;

/// Buffered change events per subscriber before the slowest one lags.
const EVENT_CAPACITY: usize = 64;

/// Change notification published by the store.
#[derive(Clone, Debug, PartialEq)]
pub enum IncidentEvent {
    /// A user reported a new incident.
    Reported(Incident),
    /// The feed re-drew severities of system incidents.
    SeveritiesChanged,
}

struct Inner {
    /// System incidents, never expire.
    seeded:   Vec<Incident>,
    /// User reports in insertion order; expired entries are dropped on read.
    reported: Vec<Incident>,
    next_id:  IncidentId,
}

/// Registry of traffic incidents for one application session.
///
/// All mutation happens in short synchronous critical sections; the lock is
/// never held across an `.await`, so a reader always sees either none or all
/// of a write.
///
/// Reads purge expired user reports lazily; there is no background timer.
pub struct IncidentStore {
    inner:  Mutex<Inner>,
    clock:  Arc<dyn Clock>,
    events: broadcast::Sender<IncidentEvent>,
}

impl IncidentStore {
    /// Create a store seeded with the built-in mock feed.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_seed(clock, default_seed())
    }

    /// Create a store seeded with `seed`.  Ids are assigned from 1 upwards in
    /// the given order and stamped with the current time.
    pub fn with_seed(clock: Arc<dyn Clock>, seed: Vec<SeedIncident>) -> Self {
        let now = clock.now_millis();
        let mut next_id = IncidentId(1);
        let seeded = seed
            .into_iter()
            .map(|s| {
                let id = next_id;
                next_id = next_id.next();
                Incident {
                    id,
                    location:     s.location,
                    severity:     s.severity,
                    kind:         s.kind,
                    description:  s.description,
                    reported_by:  Reporter::System,
                    timestamp_ms: now,
                }
            })
            .collect();

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Mutex::new(Inner { seeded, reported: Vec::new(), next_id }),
            clock,
            events,
        }
    }

    /// Subscribe to change notifications.
    ///
    /// Events are only delivered to receivers that exist when they are sent.
    pub fn subscribe(&self) -> broadcast::Receiver<IncidentEvent> {
        self.events.subscribe()
    }

    /// Seeded incidents followed by still-live user reports, in insertion
    /// order.
    ///
    /// Expired user reports are removed from the store as part of the call.
    pub fn list(&self) -> Vec<Incident> {
        let now = self.clock.now_millis();
        let mut inner = self.lock();

        let before = inner.reported.len();
        inner.reported.retain(|i| !i.is_expired(now, USER_INCIDENT_TTL_MS));
        let purged = before - inner.reported.len();
        if purged > 0 {
            debug!(purged, "purged expired user incidents");
        }

        inner.seeded.iter().chain(inner.reported.iter()).cloned().collect()
    }

    /// [`list`][Self::list] restricted to critical and major incidents.
    pub fn severe(&self) -> Vec<Incident> {
        self.list().into_iter().filter(Incident::is_severe).collect()
    }

    /// Record a user report and return the stored incident.
    ///
    /// Location is not validated.  Severity follows from `kind`; a missing or
    /// blank description falls back to the kind's default text.  Subscribers
    /// are notified without waiting for them.
    pub fn report(
        &self,
        location:    GeoPoint,
        kind:        ReportKind,
        description: Option<String>,
    ) -> Incident {
        let description = description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| kind.default_description().to_owned());

        let incident = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id = id.next();
            let incident = Incident {
                id,
                location,
                severity: kind.severity(),
                kind: kind.into(),
                description,
                reported_by: Reporter::User,
                timestamp_ms: self.clock.now_millis(),
            };
            inner.reported.push(incident.clone());
            incident
        };

        info!(
            id = %incident.id,
            kind = %incident.kind,
            severity = %incident.severity,
            location = %incident.location,
            "incident reported"
        );
        // No receivers is not an error for a fire-and-forget notification.
        let _ = self.events.send(IncidentEvent::Reported(incident.clone()));
        incident
    }

    /// Randomly re-draw the severity of every system incident, mimicking a
    /// live feed.  User reports keep the severity their kind implies.
    pub fn fluctuate(&self, rng: &mut SimRng) {
        {
            let mut inner = self.lock();
            for incident in inner.seeded.iter_mut() {
                if let Some(&severity) = rng.choose(&Severity::ALL) {
                    incident.severity = severity;
                }
            }
        }
        debug!("system incident severities re-drawn");
        let _ = self.events.send(IncidentEvent::SeveritiesChanged);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for IncidentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("IncidentStore")
            .field("seeded", &inner.seeded.len())
            .field("reported", &inner.reported.len())
            .field("next_id", &inner.next_id)
            .finish()
    }
}
