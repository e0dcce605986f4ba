//! Background incident feed: periodic refresh, optional severity churn, and
//! change-event logging.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use rt_core::SimRng;
use rt_traffic::{IncidentEvent, IncidentStore};

/// Spawn the feed.  Abort the returned handle to stop it.
pub fn spawn_feed(
    store:     Arc<IncidentStore>,
    period:    Duration,
    fluctuate: bool,
    mut rng:   SimRng,
) -> JoinHandle<()> {
    let mut events = store.subscribe();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        // The first tick fires immediately; the store was just read.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if fluctuate {
                        store.fluctuate(&mut rng);
                    }
                    let incidents = store.list();
                    let severe = incidents.iter().filter(|i| i.is_severe()).count();
                    debug!(total = incidents.len(), severe, "incident feed refreshed");
                }
                event = events.recv() => match event {
                    Ok(IncidentEvent::Reported(incident)) => info!(
                        id = %incident.id,
                        kind = %incident.kind,
                        description = %incident.description,
                        "new incident"
                    ),
                    Ok(IncidentEvent::SeveritiesChanged) => {
                        let severe = store.severe();
                        info!(severe = severe.len(), "incident severities changed");
                    }
                    Err(RecvError::Lagged(missed)) => warn!(missed, "incident events dropped"),
                    Err(RecvError::Closed) => break,
                },
            }
        }
    })
}
