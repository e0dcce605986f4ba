//! Real-time driver: one tokio task ticking a [`DriveSimulator`].

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::speed::SpeedModel;
use crate::state::{DriveSummary, Phase};
use crate::{DriveError, DriveObserver, DriveResult, DriveSimulator};

/// Handle to a drive running on the tokio runtime.
///
/// Dropping the handle, and every [`DriveStopper`] taken from it, stops the
/// run at its next tick.
pub struct DriveHandle<O> {
    active: Arc<watch::Sender<bool>>,
    task:   JoinHandle<(Option<DriveSummary>, O)>,
}

/// Detached stop button for a running drive, e.g. for a signal handler.
#[derive(Clone)]
pub struct DriveStopper(Arc<watch::Sender<bool>>);

impl DriveStopper {
    pub fn stop(&self) {
        self.0.send_replace(false);
    }
}

impl<O> DriveHandle<O> {
    /// Clear the active flag.  The task emits no further sample or
    /// completion once it observes the flag; it reports `on_stop` instead.
    pub fn stop(&self) {
        self.active.send_replace(false);
    }

    pub fn stopper(&self) -> DriveStopper {
        DriveStopper(Arc::clone(&self.active))
    }

    /// Wait for the run to end and return its summary.
    pub async fn join(self) -> DriveResult<DriveSummary> {
        self.join_with_observer().await.map(|(summary, _)| summary)
    }

    /// Like [`join`][Self::join], also handing back the observer.
    ///
    /// # Errors
    ///
    /// [`DriveError::Join`] if the task panicked, or if the simulator had no
    /// active run when it was spawned.
    pub async fn join_with_observer(self) -> DriveResult<(DriveSummary, O)> {
        // Keep the sender alive until the task is done so the drop below is
        // not mistaken for a stop request.
        let DriveHandle { active, task } = self;
        let joined = task.await;
        drop(active);
        match joined {
            Ok((Some(summary), observer)) => Ok((summary, observer)),
            Ok((None, _)) => Err(DriveError::Join("simulator was not running".into())),
            Err(e) => Err(DriveError::Join(e.to_string())),
        }
    }
}

/// Spawn a task that ticks `sim` every [`tick_period`] until the run
/// completes or is stopped.
///
/// `sim` must already be started; an idle simulator makes the task return
/// immediately.  Must be called from within a tokio runtime.
///
/// [`tick_period`]: DriveSimulator::tick_period
pub fn spawn_drive<S, O>(mut sim: DriveSimulator<S>, mut observer: O) -> DriveHandle<O>
where
    S: SpeedModel + Send + 'static,
    O: DriveObserver + Send + 'static,
{
    let (active, mut active_rx) = watch::channel(true);
    let active = Arc::new(active);
    let period = sim.tick_period();

    let task = tokio::spawn(async move {
        if sim.phase() != Phase::Running {
            return (None, observer);
        }
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                changed = active_rx.changed() => {
                    // Every sender gone counts as a stop request.
                    if changed.is_err() || !*active_rx.borrow() {
                        debug!("stop requested");
                        let summary = sim.stop(&mut observer);
                        return (summary, observer);
                    }
                }
                _ = interval.tick() => {
                    if !*active_rx.borrow() {
                        let summary = sim.stop(&mut observer);
                        return (summary, observer);
                    }
                    if sim.step(&mut observer) != Phase::Running {
                        return (sim.summary().cloned(), observer);
                    }
                }
            }
        }
    });

    DriveHandle { active, task }
}
